use super::{types::EVEN_DISTRIBUTION, util, Strategy};
use crate::error::Result;
use crate::model::{Shift, Staff, UserId};
use crate::roster::Roster;

/// Round-robin sur la liste du personnel, un planning par jour.
///
/// Le curseur n'est PAS remis à zéro chaque jour : il persiste sur tout le
/// lot, ce qui donne un round-robin global strict et une charge équilibrée
/// sur la durée.
#[derive(Debug, Clone, Copy)]
pub struct EvenDistribution {
    creator: UserId,
}

impl EvenDistribution {
    pub const TITLE: &'static str = "Even Distribution";

    pub fn new(creator: UserId) -> Self {
        Self { creator }
    }
}

impl Default for EvenDistribution {
    fn default() -> Self {
        Self::new(UserId::SYSTEM)
    }
}

impl Strategy for EvenDistribution {
    fn name(&self) -> &'static str {
        EVEN_DISTRIBUTION
    }

    fn title(&self) -> &'static str {
        Self::TITLE
    }

    fn generate(&self, shifts: &[Shift], staff: &[Staff]) -> Result<Roster> {
        util::ensure_inputs(shifts, staff)?;

        let total = staff.len();
        let mut cursor = 0usize;
        let assigned: Vec<Shift> = util::sorted_by_start(shifts)
            .into_iter()
            .map(|shift| {
                let member = &staff[cursor];
                cursor = (cursor + 1) % total;
                shift.assigned_to(&member.id)
            })
            .collect();

        tracing::debug!(shifts = shifts.len(), staff = total, "even distribution done");
        util::build_roster(Self::TITLE, self.creator, shifts, assigned, |day| {
            format!("Schedule {day}")
        })
    }
}
