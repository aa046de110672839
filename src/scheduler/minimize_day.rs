use super::{types::MINIMIZE_DAY, util, Strategy};
use crate::error::{Result, RosterError};
use crate::model::{Shift, Staff, UserId};
use crate::roster::Roster;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Concentre les shifts de chacun sur le moins de jours distincts possible.
///
/// Un jour déjà actif pour quelqu'un lui revient en entier ; un jour neuf va à
/// la personne qui a le moins de jours actifs (égalité : ordre d'entrée).
#[derive(Debug, Clone, Copy)]
pub struct MinimizeDays {
    creator: UserId,
}

impl MinimizeDays {
    pub const TITLE: &'static str = "Minimal Day Schedule";

    pub fn new(creator: UserId) -> Self {
        Self { creator }
    }
}

impl Default for MinimizeDays {
    fn default() -> Self {
        Self::new(UserId::SYSTEM)
    }
}

impl Strategy for MinimizeDays {
    fn name(&self) -> &'static str {
        MINIMIZE_DAY
    }

    fn title(&self) -> &'static str {
        Self::TITLE
    }

    fn generate(&self, shifts: &[Shift], staff: &[Staff]) -> Result<Roster> {
        util::ensure_inputs(shifts, staff)?;

        let mut active_days = vec![0usize; staff.len()];
        let mut day_owner: HashMap<NaiveDate, usize> = HashMap::new();
        let mut assigned = Vec::with_capacity(shifts.len());

        for shift in util::sorted_by_start(shifts) {
            let day = shift.day();
            let idx = match day_owner.get(&day) {
                Some(&idx) => idx,
                None => {
                    let idx = (0..staff.len())
                        .min_by_key(|&i| (active_days[i], i))
                        .ok_or_else(|| RosterError::Internal("no staff to pick from".into()))?;
                    active_days[idx] += 1;
                    day_owner.insert(day, idx);
                    idx
                }
            };
            assigned.push(shift.assigned_to(&staff[idx].id));
        }

        tracing::debug!(days = day_owner.len(), staff = staff.len(), "minimize-day done");
        util::build_roster(Self::TITLE, self.creator, shifts, assigned, |day| {
            format!("Shifts for {day}")
        })
    }
}
