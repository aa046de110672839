#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_inputs(dir: &Path) {
    fs::write(dir.join("staff.csv"), "id,name\n1,Alice\n2,Bob\n").unwrap();
    fs::write(
        dir.join("shifts.csv"),
        "start,end\n2025-05-05T08:00:00Z,2025-05-05T16:00:00Z\n2025-05-05T20:00:00Z,2025-05-06T04:00:00Z\n",
    )
    .unwrap();
}

fn cli() -> Command {
    Command::cargo_bin("roulement-cli").unwrap()
}

#[test]
fn lists_builtin_strategies() {
    cli()
        .arg("strategies")
        .assert()
        .success()
        .stdout("day_night_balanced\neven_distribution\nminimize_day\n");
}

#[test]
fn generate_prints_and_exports_the_roster() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let out = dir.path().join("roster.json");
    let store = dir.path().join("store.json");

    cli()
        .current_dir(dir.path())
        .args(["generate", "--staff", "staff.csv", "--shifts", "shifts.csv", "--notify"])
        .arg("--out")
        .arg(&out)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Even Distribution\n"))
        .stdout(predicate::str::contains(
            "Schedule 2025-05-05 | 2025-05-05T08:00:00+00:00 → 2025-05-05T16:00:00+00:00 | Alice",
        ))
        .stdout(predicate::str::contains("notify 2 : Roster 'Even Distribution' assigns you 1 shift(s)"));

    assert!(out.exists());
    let stored = fs::read_to_string(&store).unwrap();
    assert!(stored.contains("\"kind\": \"roster\""));
}

#[test]
fn generate_honours_settings_file() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    fs::write(dir.path().join("settings.json"), r#"{"default_strategy": "minimize_day"}"#).unwrap();

    cli()
        .current_dir(dir.path())
        .args(["--config", "settings.json", "generate", "--staff", "staff.csv", "--shifts", "shifts.csv"])
        .args(["--name", "Mai"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Mai\n"))
        .stdout(predicate::str::contains(
            "Shifts for 2025-05-05 | 2025-05-05T20:00:00+00:00 → 2025-05-06T04:00:00+00:00 | Alice",
        ));
}

#[test]
fn unknown_strategy_fails() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());

    cli()
        .current_dir(dir.path())
        .args(["generate", "--strategy", "nope", "--staff", "staff.csv", "--shifts", "shifts.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown strategy: nope"));
}

#[test]
fn build_reports_schedule_and_shift_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("drafts.json");
    fs::write(
        &input,
        r#"[{"name": "Lundi", "created_by": 3, "shifts": [
            {"start": "2025-05-05T08:00:00Z", "end": "2025-05-05T12:00:00Z", "staff": "1"},
            {"start": "2025-05-05T12:00:00Z", "end": "2025-05-05T18:00:00Z", "staff": {"name": "Nina"}}
        ]}]"#,
    )
    .unwrap();

    cli()
        .args(["build", "--name", "Semaine"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("Semaine: 1 schedule(s), 2 shift(s)\n");
}

#[test]
fn build_rejects_invalid_drafts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("drafts.json");
    fs::write(
        &input,
        r#"[{"name": "Lundi", "created_by": 3, "shifts": [
            {"start": "2025-05-05T08:00:00Z", "staff": "1"}
        ]}]"#,
    )
    .unwrap();

    cli()
        .arg("build")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("schedule 0: shift 0: missing end time"));
}
