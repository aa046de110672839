use crate::model::{Shift, Staff, StaffId};
use crate::roster::Roster;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV: header `id,name` (`id` vide → identifiant aléatoire)
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let staff = if id.is_empty() {
            Staff::new(name)
        } else {
            Staff::with_id(id, name)
        };
        out.push(staff);
    }
    Ok(out)
}

/// Import de shifts: header `start,end[,staff_id]` (RFC3339 UTC)
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Shift>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let start = rec.get(0).context("missing start")?.trim();
        let end = rec.get(1).context("missing end")?.trim();
        let start: DateTime<Utc> = start
            .parse()
            .with_context(|| format!("row {}: start RFC3339", line + 1))?;
        let end: DateTime<Utc> = end
            .parse()
            .with_context(|| format!("row {}: end RFC3339", line + 1))?;
        let mut shift = Shift::new(start, end)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("row {}", line + 1))?;
        if let Some(staff) = rec.get(2).map(str::trim).filter(|s| !s.is_empty()) {
            shift.staff = Some(StaffId::new(staff));
        }
        out.push(shift);
    }
    Ok(out)
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(&roster.snapshot())?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `schedule,shift_id,start,end,staff_id,staff_name`
pub fn export_shifts_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    staff: &[Staff],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(["schedule", "shift_id", "start", "end", "staff_id", "staff_name"])?;
    for schedule in roster.schedules() {
        for s in &schedule.shifts {
            let staff_id = s.staff.as_ref().map(StaffId::as_str).unwrap_or("");
            let staff_name = s
                .staff
                .as_ref()
                .and_then(|id| staff.iter().find(|p| &p.id == id))
                .map(|p| p.name.as_str())
                .unwrap_or("");
            let start = s.start.to_rfc3339();
            let end = s.end.to_rfc3339();
            w.write_record([
                schedule.name.as_str(),
                s.id.as_str(),
                start.as_str(),
                end.as_str(),
                staff_id,
                staff_name,
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
