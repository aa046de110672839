#![forbid(unsafe_code)]
use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use roulement::scheduler::{DAY_NIGHT_BALANCED, EVEN_DISTRIBUTION, MINIMIZE_DAY};
use roulement::{
    DayNightBalance, DayWindow, EvenDistribution, MinimizeDays, Roster, RosterError, Shift,
    ShiftId, Staff, StaffId, Strategy, StrategyRegistry, UserId,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
}

fn shift(start: DateTime<Utc>, hours: i64) -> Shift {
    Shift::new(start, start + Duration::hours(hours)).unwrap()
}

fn team() -> Vec<Staff> {
    vec![
        Staff::with_id("1", "Alice"),
        Staff::with_id("2", "Bob"),
        Staff::with_id("3", "Charlie"),
    ]
}

/// 3 jours × (8h, 16h, 22h)
fn three_day_shifts() -> Vec<Shift> {
    (15..18)
        .flat_map(|day| [8, 16, 22].map(|hour| shift(at(day, hour), 8)))
        .collect()
}

/// 3 shifts de jour (8h) puis 3 de nuit (20h) sur trois jours
fn mixed_shifts() -> Vec<Shift> {
    let mut shifts: Vec<Shift> = (15..18).map(|day| shift(at(day, 8), 8)).collect();
    shifts.extend((15..18).map(|day| shift(at(day, 20), 8)));
    shifts
}

fn all_shifts(roster: &Roster) -> Vec<Shift> {
    roster
        .schedules()
        .into_iter()
        .flat_map(|s| s.shifts)
        .collect()
}

fn counts_by_staff(roster: &Roster) -> HashMap<StaffId, usize> {
    let mut counts = HashMap::new();
    for s in all_shifts(roster) {
        *counts.entry(s.staff.expect("assigned")).or_insert(0) += 1;
    }
    counts
}

fn builtins() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(EvenDistribution::default()),
        Box::new(MinimizeDays::default()),
        Box::new(DayNightBalance::default()),
    ]
}

#[test]
fn every_strategy_assigns_each_shift_exactly_once() {
    let staff = team();
    let inputs = [three_day_shifts(), mixed_shifts(), vec![shift(at(20, 3), 2)]];

    for strategy in builtins() {
        for shifts in &inputs {
            let roster = strategy.generate(shifts, &staff).unwrap();
            let produced = all_shifts(&roster);
            assert_eq!(produced.len(), shifts.len(), "{}", strategy.name());

            let ids: BTreeSet<&str> = produced.iter().map(|s| s.id.as_str()).collect();
            let expected: BTreeSet<&str> = shifts.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids, expected, "{}", strategy.name());
            assert!(produced.iter().all(|s| s.staff.is_some()));
        }
    }
}

#[test]
fn inputs_are_left_untouched() {
    let staff = team();
    let shifts = three_day_shifts();
    for strategy in builtins() {
        strategy.generate(&shifts, &staff).unwrap();
    }
    assert!(shifts.iter().all(|s| s.staff.is_none()));
}

#[test]
fn empty_inputs_are_rejected() {
    let staff = team();
    let shifts = three_day_shifts();
    for strategy in builtins() {
        let err = strategy.generate(&[], &staff).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)), "{err}");
        let err = strategy.generate(&shifts, &[]).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)), "{err}");
        assert!(err.to_string().contains("missing shifts or staff"));
    }
}

#[test]
fn rosters_carry_a_fixed_title() {
    let staff = team();
    let shifts = three_day_shifts();
    let titles: Vec<String> = builtins()
        .iter()
        .map(|s| s.generate(&shifts, &staff).unwrap().name().unwrap())
        .collect();
    assert_eq!(
        titles,
        ["Even Distribution", "Minimal Day Schedule", "Day/Night Balanced Schedule"]
    );
}

#[test]
fn even_distribution_gives_three_shifts_each() {
    let staff = team();
    let roster = EvenDistribution::default()
        .generate(&three_day_shifts(), &staff)
        .unwrap();

    assert_eq!(roster.schedule_count(), 3);
    let counts = counts_by_staff(&roster);
    for member in &staff {
        assert_eq!(counts[&member.id], 3, "{}", member.name);
    }
    let names: Vec<String> = roster.schedules().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["Schedule 2025-01-15", "Schedule 2025-01-16", "Schedule 2025-01-17"]);
}

#[test]
fn even_distribution_keeps_cursor_across_days() {
    let staff = team();
    // deux shifts par jour : un curseur remis à zéro donnerait Alice/Bob chaque jour
    let shifts: Vec<Shift> = (15..18)
        .flat_map(|day| [9, 14].map(|hour| shift(at(day, hour), 4)))
        .collect();
    let roster = EvenDistribution::default().generate(&shifts, &staff).unwrap();

    let order: Vec<String> = all_shifts(&roster)
        .into_iter()
        .map(|s| s.staff.unwrap().as_str().to_string())
        .collect();
    assert_eq!(order, ["1", "2", "3", "1", "2", "3"]);
}

#[test]
fn even_distribution_is_floor_or_ceil_on_one_day() {
    let staff = team();
    let shifts: Vec<Shift> = (0..10)
        .map(|i| shift(at(15, 0) + Duration::minutes(i * 90), 1))
        .collect();
    let counts = counts_by_staff(&EvenDistribution::default().generate(&shifts, &staff).unwrap());
    for member in &staff {
        let n = counts.get(&member.id).copied().unwrap_or(0);
        assert!(n == 3 || n == 4, "{} got {n}", member.name);
    }
}

#[test]
fn even_distribution_follows_start_order_not_input_order() {
    let staff = team();
    let mut shifts = three_day_shifts();
    let forward = EvenDistribution::default().generate(&shifts, &staff).unwrap();
    shifts.reverse();
    let backward = EvenDistribution::default().generate(&shifts, &staff).unwrap();

    let by_id = |roster: &Roster| -> HashMap<ShiftId, StaffId> {
        all_shifts(roster)
            .into_iter()
            .map(|s| (s.id, s.staff.unwrap()))
            .collect()
    };
    assert_eq!(by_id(&forward), by_id(&backward));
}

#[test]
fn minimize_days_gives_whole_day_to_one_person() {
    let staff = team();
    let shifts: Vec<Shift> = [8, 12, 16].map(|hour| shift(at(15, hour), 4)).to_vec();
    let roster = MinimizeDays::default().generate(&shifts, &staff).unwrap();

    let counts = counts_by_staff(&roster);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[&StaffId::new("1")], 3);
}

#[test]
fn minimize_days_keeps_one_active_day_per_person() {
    let staff = team();
    let roster = MinimizeDays::default()
        .generate(&three_day_shifts(), &staff)
        .unwrap();

    let mut days: HashMap<StaffId, BTreeSet<chrono::NaiveDate>> = HashMap::new();
    for s in all_shifts(&roster) {
        days.entry(s.staff.clone().unwrap()).or_default().insert(s.day());
    }
    assert_eq!(days.len(), 3);
    assert!(days.values().all(|d| d.len() == 1));
    assert_eq!(roster.schedules()[0].name, "Shifts for 2025-01-15");
}

#[test]
fn minimize_days_spreads_new_days_to_least_busy() {
    let staff = vec![Staff::with_id("a", "A"), Staff::with_id("b", "B")];
    let shifts: Vec<Shift> = (15..19).map(|day| shift(at(day, 9), 8)).collect();
    let roster = MinimizeDays::default().generate(&shifts, &staff).unwrap();

    let order: Vec<String> = all_shifts(&roster)
        .into_iter()
        .map(|s| s.staff.unwrap().as_str().to_string())
        .collect();
    assert_eq!(order, ["a", "b", "a", "b"]);
}

#[test]
fn day_night_balance_stays_within_one() {
    let staff = team();
    let strategy = DayNightBalance::default();
    let alternating: Vec<Shift> = (15..19)
        .flat_map(|day| [9, 21].map(|hour| shift(at(day, hour), 8)))
        .collect();
    for shifts in [mixed_shifts(), alternating] {
        let roster = strategy.generate(&shifts, &staff).unwrap();
        let mut tally: HashMap<StaffId, (i64, i64)> = HashMap::new();
        for s in all_shifts(&roster) {
            let entry = tally.entry(s.staff.clone().unwrap()).or_default();
            if (6..18).contains(&s.start.hour()) {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
        for (id, (day, night)) in tally {
            assert!((day - night).abs() <= 1, "{id}: {day} day / {night} night");
        }
    }
}

#[test]
fn day_night_balance_with_days_before_nights() {
    let staff = vec![Staff::with_id("a", "A"), Staff::with_id("b", "B")];
    let mut shifts: Vec<Shift> = (15..18).map(|day| shift(at(day, 8), 8)).collect();
    shifts.extend((18..21).map(|day| shift(at(day, 20), 8)));
    let roster = DayNightBalance::default().generate(&shifts, &staff).unwrap();

    let mut tally: HashMap<String, (i64, i64)> = HashMap::new();
    for s in all_shifts(&roster) {
        let entry = tally.entry(s.staff.clone().unwrap().to_string()).or_default();
        if (6..18).contains(&s.start.hour()) {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    assert_eq!(tally["a"], (2, 1));
    assert_eq!(tally["b"], (1, 2));
}

#[test]
fn day_night_balance_spreads_pairs_across_staff() {
    let staff = team();
    let roster = DayNightBalance::default()
        .generate(&mixed_shifts(), &staff)
        .unwrap();
    let counts = counts_by_staff(&roster);
    for member in &staff {
        assert_eq!(counts[&member.id], 2, "{}", member.name);
    }
}

#[test]
fn day_night_window_uses_local_hour() {
    let window = DayWindow {
        start_hour: 6,
        end_hour: 18,
        utc_offset_minutes: 180,
    };
    let strategy = DayNightBalance::new(UserId::SYSTEM, window);
    // 04:00 UTC = 07:00 locale
    let early = shift(at(15, 4), 4);
    assert_eq!(strategy.classify(&early), roulement::scheduler::ShiftKind::Day);
    assert_eq!(
        DayNightBalance::default().classify(&early),
        roulement::scheduler::ShiftKind::Night
    );
}

#[test]
fn registry_resolves_builtins_by_stable_name() {
    let registry = StrategyRegistry::default();
    assert_eq!(
        registry.names(),
        [DAY_NIGHT_BALANCED, EVEN_DISTRIBUTION, MINIMIZE_DAY]
    );
    assert_eq!(registry.resolve("minimize_day").unwrap().title(), "Minimal Day Schedule");
    assert!(registry.resolve("Even_Distribution").is_none());
    assert!(registry.resolve("nope").is_none());

    let err = registry.require("nope").unwrap_err();
    assert!(matches!(err, RosterError::UnknownStrategy(ref name) if name == "nope"));

    let shown = format!("{:?}", registry.require(MINIMIZE_DAY).unwrap());
    assert!(shown.contains("minimize_day"), "{shown}");
}

struct FirstComeTakesAll;

impl Strategy for FirstComeTakesAll {
    fn name(&self) -> &'static str {
        "first_come"
    }

    fn title(&self) -> &'static str {
        "First Come"
    }

    fn generate(&self, shifts: &[Shift], staff: &[Staff]) -> roulement::error::Result<Roster> {
        let first = staff
            .first()
            .ok_or_else(|| RosterError::invalid_input("no staff"))?;
        let mut schedule = roulement::Schedule::new("all", UserId::SYSTEM);
        schedule.shifts = shifts.iter().cloned().map(|s| s.assigned_to(&first.id)).collect();
        let roster = Roster::named(self.title());
        roster.add_schedule(schedule);
        Ok(roster)
    }
}

#[test]
fn registry_accepts_runtime_strategies() {
    let registry = StrategyRegistry::default();
    assert!(registry.register("first_come", Arc::new(FirstComeTakesAll)).is_none());
    assert!(registry.contains("first_come"));

    let roster = registry
        .require("first_come")
        .unwrap()
        .generate(&three_day_shifts(), &team())
        .unwrap();
    assert_eq!(roster.shift_count(), 9);

    let previous = registry.register(EVEN_DISTRIBUTION, Arc::new(FirstComeTakesAll));
    assert_eq!(previous.unwrap().title(), "Even Distribution");
}

#[test]
fn registry_is_shared_between_threads() {
    let registry = Arc::new(StrategyRegistry::default());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .require(EVEN_DISTRIBUTION)
                    .unwrap()
                    .generate(&three_day_shifts(), &team())
                    .unwrap()
                    .shift_count()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 9);
    }
}
