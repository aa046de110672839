use crate::model::{RosterId, Schedule, Shift, StaffId};

/// Partie intéressée par les changements d'un roster.
pub trait Observer: Send + Sync {
    /// Identité utilisée pour rendre `attach`/`detach` idempotents.
    fn observer_key(&self) -> &str;

    /// Appelé sous le verrou du roster : ne pas rappeler le roster ici.
    fn update(&self, update: &RosterUpdate<'_>) -> anyhow::Result<()>;
}

/// Charge utile livrée à chaque observateur.
#[derive(Debug, Clone, Copy)]
pub struct RosterUpdate<'a> {
    pub roster_id: &'a RosterId,
    pub roster_name: &'a str,
    pub schedules: &'a [Schedule],
    pub message: &'a str,
}

impl<'a> RosterUpdate<'a> {
    pub fn shift_count(&self) -> usize {
        self.schedules.iter().map(Schedule::shift_count).sum()
    }

    pub fn shifts_for(&self, staff: &StaffId) -> Vec<&'a Shift> {
        self.schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .filter(|s| s.staff.as_ref() == Some(staff))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    pub observer: String,
    pub error: String,
}

/// Bilan d'un cycle de notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failures: Vec<ObserverFailure>,
}

impl NotifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}
