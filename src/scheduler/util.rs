use crate::error::{Result, RosterError};
use crate::model::{Schedule, Shift, ShiftId, Staff, UserId};
use crate::roster::Roster;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub(super) fn ensure_inputs(shifts: &[Shift], staff: &[Staff]) -> Result<()> {
    if shifts.is_empty() || staff.is_empty() {
        return Err(RosterError::invalid_input("missing shifts or staff"));
    }
    Ok(())
}

/// Copie triée par début ; le tri est stable, l'ordre d'entrée départage.
pub(super) fn sorted_by_start(shifts: &[Shift]) -> Vec<Shift> {
    let mut ordered = shifts.to_vec();
    ordered.sort_by_key(|s| s.start);
    ordered
}

pub(super) fn group_by_day(shifts: Vec<Shift>) -> BTreeMap<NaiveDate, Vec<Shift>> {
    let mut days: BTreeMap<NaiveDate, Vec<Shift>> = BTreeMap::new();
    for shift in shifts {
        days.entry(shift.day()).or_default().push(shift);
    }
    days
}

/// Assemble le roster final : un planning par jour, puis vérification que
/// chaque shift d'entrée est présent une et une seule fois, assigné.
pub(super) fn build_roster<F>(
    title: &str,
    creator: UserId,
    input: &[Shift],
    assigned: Vec<Shift>,
    label: F,
) -> Result<Roster>
where
    F: Fn(NaiveDate) -> String,
{
    let schedules: Vec<Schedule> = group_by_day(assigned)
        .into_iter()
        .map(|(day, shifts)| {
            let mut schedule = Schedule::new(label(day), creator);
            schedule.shifts = shifts;
            schedule
        })
        .collect();

    ensure_complete(input, &schedules)?;
    Ok(Roster::from_schedules(Some(title.to_string()), schedules))
}

pub(super) fn ensure_complete(input: &[Shift], schedules: &[Schedule]) -> Result<()> {
    let mut expected: HashMap<&ShiftId, isize> = HashMap::new();
    for shift in input {
        *expected.entry(&shift.id).or_default() += 1;
    }

    for shift in schedules.iter().flat_map(|s| s.shifts.iter()) {
        if shift.staff.is_none() {
            return Err(RosterError::Internal(format!(
                "shift {} left unassigned",
                shift.id.as_str()
            )));
        }
        match expected.get_mut(&shift.id) {
            Some(count) => *count -= 1,
            None => {
                return Err(RosterError::Internal(format!(
                    "shift {} does not belong to the input",
                    shift.id.as_str()
                )))
            }
        }
    }

    if let Some((id, _)) = expected.iter().find(|(_, count)| **count != 0) {
        return Err(RosterError::Internal(format!(
            "shift {} dropped or duplicated",
            id.as_str()
        )));
    }
    Ok(())
}
