#![forbid(unsafe_code)]
use anyhow::bail;
use chrono::{DateTime, Duration, TimeZone, Utc};
use roulement::{
    attach_staff, dispatch_to_assigned, prepare_reminder, Notification, NotificationCenter,
    NotificationSink, Roster, RosterError, Schedule, Shift, Staff, StaffId, TextReminder, UserId,
};
use std::sync::Arc;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

fn assigned(day: u32, hour: u32, staff: &str) -> Shift {
    Shift::new(at(day, hour), at(day, hour) + Duration::hours(8))
        .unwrap()
        .assigned_to(&StaffId::new(staff))
}

/// Bob : 1 shift ; Alice : 2 shifts sur deux plannings.
fn march() -> Roster {
    let roster = Roster::named("Mars");
    let mut monday = Schedule::new("Monday", UserId(1));
    monday.push_shift(assigned(10, 16, "2"));
    monday.push_shift(assigned(10, 8, "1"));
    let mut tuesday = Schedule::new("Tuesday", UserId(1));
    tuesday.push_shift(assigned(11, 8, "1"));
    roster.add_schedule(monday);
    roster.add_schedule(tuesday);
    roster
}

#[test]
fn center_tracks_read_state_per_receiver() {
    let center = NotificationCenter::new();
    let alice = StaffId::new("1");
    let bob = StaffId::new("2");
    let first = center.create_notification(&alice, "first").unwrap();
    center.create_notification(&bob, "for bob").unwrap();
    center.create_notification(&alice, "second").unwrap();

    let messages: Vec<String> = center
        .for_receiver(&alice)
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, ["second", "first"]);
    assert_eq!(center.unread_count(&alice), 2);

    let read = center.mark_as_read(&alice, &first.id).unwrap();
    assert!(read.read);
    assert_eq!(center.unread_count(&alice), 1);
    let err = center
        .mark_as_read(&alice, &roulement::notification::NotificationId::random())
        .unwrap_err();
    assert!(matches!(err, RosterError::NotFound(_)), "{err}");

    assert_eq!(center.clear(&alice), 2);
    assert_eq!(center.len(), 1);
    assert_eq!(center.clear(&alice), 0);
}

#[test]
fn nobody_marks_someone_elses_notification() {
    let center = NotificationCenter::new();
    let alice = StaffId::new("1");
    let bob = StaffId::new("2");
    let for_bob = center.create_notification(&bob, "for bob").unwrap();

    let err = center.mark_as_read(&alice, &for_bob.id).unwrap_err();
    assert!(matches!(err, RosterError::Forbidden(_)), "{err}");
    assert_eq!(center.unread_count(&bob), 1);

    assert!(center.mark_as_read(&bob, &for_bob.id).unwrap().read);
    assert_eq!(center.unread_count(&bob), 0);
}

#[test]
fn dispatch_notifies_each_assigned_member_once() {
    let center = NotificationCenter::new();
    let report = dispatch_to_assigned(&march(), &center);

    assert!(report.failures.is_empty());
    let lines: Vec<String> = report
        .sent
        .iter()
        .map(|n| format!("{} {}", n.receiver, n.message))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r#"
2 Roster 'Mars' assigns you 1 shift(s)
1 Roster 'Mars' assigns you 2 shift(s)
"#);
    assert_eq!(center.len(), 2);
}

struct RejectBob;

impl NotificationSink for RejectBob {
    fn create_notification(&self, receiver: &StaffId, message: &str) -> anyhow::Result<Notification> {
        if receiver.as_str() == "2" {
            bail!("bob has no mailbox");
        }
        Ok(Notification::new(receiver.clone(), message))
    }
}

#[test]
fn dispatch_collects_sink_failures() {
    let report = dispatch_to_assigned(&march(), &RejectBob);
    assert_eq!(report.sent.len(), 1);
    assert_eq!(report.failures, [(StaffId::new("2"), "bob has no mailbox".to_string())]);
}

#[test]
fn attach_staff_skips_members_already_observing() {
    let center = Arc::new(NotificationCenter::new());
    let sink: Arc<dyn NotificationSink> = center.clone();
    let roster = march();
    let team = [Staff::with_id("1", "Alice"), Staff::with_id("2", "Bob")];

    assert_eq!(attach_staff(&roster, &team, &sink), 2);
    assert_eq!(attach_staff(&roster, &team, &sink), 0);

    roster.rename("Mars v2");
    roster.notify_observers();
    let latest = &center.for_receiver(&StaffId::new("2"))[0];
    assert_eq!(latest.message, "Roster 'Mars v2' has been updated");
}

#[test]
fn reminder_targets_next_upcoming_shift() {
    let alice = Staff::with_id("1", "Alice");
    let reminder = prepare_reminder(&march(), &alice, 2, at(1, 0), &TextReminder).unwrap();

    assert_eq!(reminder.receiver, alice.id);
    assert_eq!(reminder.notice_at, at(8, 8));
    insta::assert_snapshot!(reminder.content, @r#"
Bonjour Alice,

Tu travailles sur le planning "Mars" du 2025-03-10T08:00:00+00:00 au 2025-03-10T16:00:00+00:00.
Ce message est généré le 2025-03-08T08:00:00+00:00.
"#);

    // après le premier shift, c'est le second qui est visé
    let later = prepare_reminder(&march(), &alice, 0, at(10, 12), &TextReminder).unwrap();
    assert_eq!(later.notice_at, at(11, 8));
}

#[test]
fn reminder_errors() {
    let roster = march();
    let alice = Staff::with_id("1", "Alice");
    let err = prepare_reminder(&roster, &alice, -1, at(1, 0), &TextReminder).unwrap_err();
    assert!(err.to_string().contains("days_before"));

    let err = prepare_reminder(&roster, &alice, 1, at(20, 0), &TextReminder).unwrap_err();
    assert_eq!(err.to_string(), "no upcoming shift found for staff 1");

    let stranger = Staff::with_id("9", "Zoé");
    assert!(prepare_reminder(&roster, &stranger, 1, at(1, 0), &TextReminder).is_err());
}
