#![forbid(unsafe_code)]
//! Roulement : moteur d'affectation de créneaux au personnel.
//!
//! - Stratégies interchangeables (répartition égale, jours minimaux,
//!   équilibre jour/nuit), choisies par nom via un registre.
//! - Rosters observables : chaque modification notifie les observateurs.
//! - Factories transactionnelles au-dessus d'un collaborateur de persistance.
//! - Tout en UTC ; parsing RFC3339.

pub mod config;
pub mod error;
pub mod factory;
#[cfg(feature = "csv")]
pub mod io;
pub mod model;
pub mod notification;
pub mod roster;
pub mod scheduler;
pub mod storage;

pub use config::Settings;
pub use error::{RosterError, ValidationError};
pub use factory::{
    GroupRosterFactory, NewStaff, ScheduleDraft, ShiftDraft, SingleRosterFactory, StaffKey, StaffRef,
};
pub use model::{RosterId, Schedule, ScheduleId, Shift, ShiftId, Staff, StaffId, UserId};
pub use notification::{
    attach_staff, dispatch_to_assigned, prepare_reminder, DispatchReport, Notification,
    NotificationCenter, NotificationSink, Reminder, ReminderRenderer, StaffObserver, TextReminder,
};
pub use roster::{NotifyReport, Observer, ObserverFailure, Roster, RosterOptions, RosterPhase, RosterSnapshot, RosterUpdate};
pub use scheduler::{
    DayNightBalance, DayWindow, EvenDistribution, MinimizeDays, Strategy, StrategyRegistry,
};
pub use storage::{JsonStorage, MemoryStore, Persistence, Record, StoreSnapshot};
