use super::{
    types::{DayWindow, ShiftKind, DAY_NIGHT_BALANCED},
    util, Strategy,
};
use crate::error::{Result, RosterError};
use crate::model::{Shift, Staff, UserId};
use crate::roster::Roster;
use chrono::{FixedOffset, Offset, Timelike, Utc};

/// Garde le ratio jour/nuit de chaque personne proche de 1:1.
///
/// Chaque shift va à la personne dont l'écart `|jour - nuit|` sera le plus
/// faible une fois le shift pris ; à égalité, l'écart actuel le plus faible,
/// puis le moins de shifts déjà pris.
#[derive(Debug, Clone, Copy)]
pub struct DayNightBalance {
    creator: UserId,
    window: DayWindow,
}

impl DayNightBalance {
    pub const TITLE: &'static str = "Day/Night Balanced Schedule";

    pub fn new(creator: UserId, window: DayWindow) -> Self {
        Self { creator, window }
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn classify(&self, shift: &Shift) -> ShiftKind {
        let offset = FixedOffset::east_opt(self.window.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());
        let hour = shift.start.with_timezone(&offset).hour();
        if self.window.contains_hour(hour) {
            ShiftKind::Day
        } else {
            ShiftKind::Night
        }
    }
}

impl Default for DayNightBalance {
    fn default() -> Self {
        Self::new(UserId::SYSTEM, DayWindow::default())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    day: i64,
    night: i64,
}

impl Tally {
    fn gap(&self) -> i64 {
        (self.day - self.night).abs()
    }

    fn gap_after(&self, kind: ShiftKind) -> i64 {
        match kind {
            ShiftKind::Day => (self.day + 1 - self.night).abs(),
            ShiftKind::Night => (self.day - self.night - 1).abs(),
        }
    }

    fn total(&self) -> i64 {
        self.day + self.night
    }

    fn record(&mut self, kind: ShiftKind) {
        match kind {
            ShiftKind::Day => self.day += 1,
            ShiftKind::Night => self.night += 1,
        }
    }
}

impl Strategy for DayNightBalance {
    fn name(&self) -> &'static str {
        DAY_NIGHT_BALANCED
    }

    fn title(&self) -> &'static str {
        Self::TITLE
    }

    fn generate(&self, shifts: &[Shift], staff: &[Staff]) -> Result<Roster> {
        util::ensure_inputs(shifts, staff)?;

        let mut tallies = vec![Tally::default(); staff.len()];
        let mut assigned = Vec::with_capacity(shifts.len());

        for shift in util::sorted_by_start(shifts) {
            let kind = self.classify(&shift);
            // écart après prise, puis écart courant, puis charge, puis ordre d'entrée
            let idx = (0..staff.len())
                .min_by_key(|&i| {
                    let t = &tallies[i];
                    (t.gap_after(kind), t.gap(), t.total(), i)
                })
                .ok_or_else(|| RosterError::Internal("no staff to pick from".into()))?;
            tallies[idx].record(kind);
            assigned.push(shift.assigned_to(&staff[idx].id));
        }

        tracing::debug!(shifts = shifts.len(), staff = staff.len(), "day/night balance done");
        util::build_roster(Self::TITLE, self.creator, shifts, assigned, |day| {
            format!("Day/Night {day}")
        })
    }
}
