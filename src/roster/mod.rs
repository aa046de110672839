mod observer;

pub use observer::{NotifyReport, Observer, ObserverFailure, RosterUpdate};

use crate::error::{Result, RosterError};
use crate::model::{RosterId, Schedule, ScheduleId, Shift, ShiftId, StaffId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options de comportement d'un roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOptions {
    /// Notifier aussi lors d'un retrait de planning.
    pub notify_on_remove: bool,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            notify_on_remove: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterPhase {
    Empty,
    Populated,
}

/// Forme persistable d'un roster (sans observateurs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub id: RosterId,
    pub name: Option<String>,
    pub schedules: Vec<Schedule>,
}

struct RosterState {
    name: Option<String>,
    schedules: Vec<Schedule>,
    observers: Vec<Arc<dyn Observer>>,
}

/// Roster observable : possède ses plannings, référence ses observateurs.
///
/// Un seul verrou protège plannings et observateurs ; il est tenu pendant
/// tout le cycle de notification, donc un `detach` terminé avant un
/// `notify_observers` ne reçoit jamais cette notification.
pub struct Roster {
    id: RosterId,
    options: RosterOptions,
    state: Mutex<RosterState>,
}

impl Roster {
    pub fn new(name: Option<String>) -> Self {
        Self::from_schedules(name, Vec::new())
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self::new(Some(name.into()))
    }

    pub(crate) fn from_schedules(name: Option<String>, schedules: Vec<Schedule>) -> Self {
        Self {
            id: RosterId::random(),
            options: RosterOptions::default(),
            state: Mutex::new(RosterState {
                name,
                schedules,
                observers: Vec::new(),
            }),
        }
    }

    pub fn from_snapshot(snapshot: RosterSnapshot) -> Self {
        Self {
            id: snapshot.id,
            options: RosterOptions::default(),
            state: Mutex::new(RosterState {
                name: snapshot.name,
                schedules: snapshot.schedules,
                observers: Vec::new(),
            }),
        }
    }

    pub fn with_options(mut self, options: RosterOptions) -> Self {
        self.options = options;
        self
    }

    fn lock(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &RosterId {
        &self.id
    }

    pub fn options(&self) -> RosterOptions {
        self.options
    }

    pub fn name(&self) -> Option<String> {
        self.lock().name.clone()
    }

    pub fn rename<N: Into<String>>(&self, name: N) {
        self.lock().name = Some(name.into());
    }

    /// Nom affiché, avec repli sur un nom dérivé de l'identifiant.
    pub fn display_name(&self) -> String {
        display_name(&self.id, self.lock().name.as_deref())
    }

    pub fn phase(&self) -> RosterPhase {
        if self.lock().schedules.is_empty() {
            RosterPhase::Empty
        } else {
            RosterPhase::Populated
        }
    }

    pub fn schedules(&self) -> Vec<Schedule> {
        self.lock().schedules.clone()
    }

    pub fn schedule_count(&self) -> usize {
        self.lock().schedules.len()
    }

    pub fn shift_count(&self) -> usize {
        self.lock().schedules.iter().map(Schedule::shift_count).sum()
    }

    /// Tous les shifts d'une personne, tous plannings confondus, par ordre de début.
    pub fn shifts_for(&self, staff: &StaffId) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .lock()
            .schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .filter(|s| s.staff.as_ref() == Some(staff))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start);
        shifts
    }

    /// Tous les shifts du roster, par ordre de début.
    pub fn all_shifts(&self) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .lock()
            .schedules
            .iter()
            .flat_map(|s| s.shifts.iter().cloned())
            .collect();
        shifts.sort_by_key(|s| s.start);
        shifts
    }

    /// Personnes assignées, sans doublon, dans l'ordre de première apparition.
    pub fn assigned_staff(&self) -> Vec<StaffId> {
        let state = self.lock();
        let mut out: Vec<StaffId> = Vec::new();
        for id in state
            .schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .filter_map(|s| s.staff.as_ref())
        {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let state = self.lock();
        RosterSnapshot {
            id: self.id.clone(),
            name: state.name.clone(),
            schedules: state.schedules.clone(),
        }
    }

    pub fn add_schedule(&self, schedule: Schedule) -> NotifyReport {
        let mut state = self.lock();
        state.schedules.push(schedule);
        self.deliver(&state)
    }

    /// Retire un planning par identité ; `None` s'il est absent. Le bilan est
    /// vide quand `notify_on_remove` est désactivé.
    pub fn remove_schedule(&self, id: &ScheduleId) -> Option<NotifyReport> {
        let mut state = self.lock();
        let pos = state.schedules.iter().position(|s| &s.id == id)?;
        state.schedules.remove(pos);
        if self.options.notify_on_remove {
            Some(self.deliver(&state))
        } else {
            Some(NotifyReport::default())
        }
    }

    /// Affectation manuelle : ajoute `shift`, assigné à `staff`, dans un
    /// planning existant du roster, puis notifie.
    pub fn assign_shift(
        &self,
        schedule: &ScheduleId,
        shift: Shift,
        staff: &StaffId,
    ) -> Result<NotifyReport> {
        if staff.as_str().trim().is_empty() {
            return Err(RosterError::invalid_input("staff id cannot be empty"));
        }
        let mut state = self.lock();
        if state
            .schedules
            .iter()
            .flat_map(|s| s.shifts.iter())
            .any(|s| s.id == shift.id)
        {
            return Err(RosterError::invalid_input(format!(
                "shift {} already belongs to this roster",
                shift.id.as_str()
            )));
        }
        let target = state
            .schedules
            .iter_mut()
            .find(|s| &s.id == schedule)
            .ok_or_else(|| RosterError::NotFound(format!("schedule {}", schedule.as_str())))?;
        target.push_shift(shift.assigned_to(staff));
        tracing::info!(schedule = schedule.as_str(), staff = %staff, "shift assigned manually");
        Ok(self.deliver(&state))
    }

    /// Pointage d'arrivée d'une personne sur un de ses shifts.
    pub fn clock_in(&self, staff: &StaffId, shift: &ShiftId, at: DateTime<Utc>) -> Result<Shift> {
        self.punch(staff, shift, |s| s.clock_in(at))
    }

    pub fn clock_out(&self, staff: &StaffId, shift: &ShiftId, at: DateTime<Utc>) -> Result<Shift> {
        self.punch(staff, shift, |s| s.clock_out(at))
    }

    fn punch<F>(&self, staff: &StaffId, shift: &ShiftId, apply: F) -> Result<Shift>
    where
        F: FnOnce(&mut Shift) -> std::result::Result<(), String>,
    {
        let mut state = self.lock();
        let target = state
            .schedules
            .iter_mut()
            .flat_map(|s| s.shifts.iter_mut())
            .find(|s| &s.id == shift)
            .ok_or_else(|| RosterError::NotFound(format!("shift {}", shift.as_str())))?;
        if target.staff.as_ref() != Some(staff) {
            return Err(RosterError::Forbidden(format!(
                "shift {} is not assigned to staff {staff}",
                shift.as_str()
            )));
        }
        apply(&mut *target).map_err(RosterError::InvalidInput)?;
        tracing::debug!(shift = shift.as_str(), staff = %staff, "shift punched");
        Ok(target.clone())
    }

    /// `false` si un observateur de même identité était déjà attaché.
    pub fn attach(&self, observer: Arc<dyn Observer>) -> bool {
        let mut state = self.lock();
        let key = observer.observer_key();
        if state.observers.iter().any(|o| o.observer_key() == key) {
            return false;
        }
        state.observers.push(observer);
        true
    }

    /// `false` si l'observateur n'était pas attaché.
    pub fn detach(&self, observer: &dyn Observer) -> bool {
        let mut state = self.lock();
        let key = observer.observer_key();
        let before = state.observers.len();
        state.observers.retain(|o| o.observer_key() != key);
        before != state.observers.len()
    }

    pub fn is_observed_by(&self, key: &str) -> bool {
        self.lock().observers.iter().any(|o| o.observer_key() == key)
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn notify_observers(&self) -> NotifyReport {
        let state = self.lock();
        self.deliver(&state)
    }

    fn deliver(&self, state: &RosterState) -> NotifyReport {
        let name = display_name(&self.id, state.name.as_deref());
        let message = format!("Roster '{name}' has been updated");
        let update = RosterUpdate {
            roster_id: &self.id,
            roster_name: &name,
            schedules: &state.schedules,
            message: &message,
        };

        let mut report = NotifyReport::default();
        for observer in &state.observers {
            let key = observer.observer_key();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.update(&update)))
                .unwrap_or_else(|_| Err(anyhow::anyhow!("observer panicked")));
            match outcome {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!(roster = %name, observer = key, "update delivered");
                }
                Err(err) => {
                    tracing::warn!(roster = %name, observer = key, error = %err, "observer update failed");
                    report.failures.push(ObserverFailure {
                        observer: key.to_string(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }
        report
    }
}

fn display_name(id: &RosterId, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            let raw = id.as_str();
            format!("roster-{}", raw.get(..8).unwrap_or(raw))
        }
    }
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Roster")
            .field("id", &self.id)
            .field("name", &state.name)
            .field("schedules", &state.schedules.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}
