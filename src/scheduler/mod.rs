mod day_night;
mod even;
mod minimize_day;
mod registry;
mod types;
mod util;

pub use day_night::DayNightBalance;
pub use even::EvenDistribution;
pub use minimize_day::MinimizeDays;
pub use registry::StrategyRegistry;
pub use types::{DayWindow, ShiftKind, DAY_NIGHT_BALANCED, EVEN_DISTRIBUTION, MINIMIZE_DAY};

use crate::error::Result;
use crate::model::{Shift, Staff};
use crate::roster::Roster;
use std::fmt;

/// Politique d'affectation : (shifts, staff) → roster entièrement assigné.
///
/// Les entrées ne sont jamais modifiées ; le roster renvoyé contient des
/// copies assignées. Soit tout est assigné, soit une erreur est renvoyée.
pub trait Strategy: Send + Sync {
    /// Clé stable sous laquelle la stratégie est publiée.
    fn name(&self) -> &'static str;

    /// Titre donné au roster produit.
    fn title(&self) -> &'static str;

    fn generate(&self, shifts: &[Shift], staff: &[Staff]) -> Result<Roster>;
}

impl fmt::Debug for dyn Strategy + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name())
            .field("title", &self.title())
            .finish()
    }
}
