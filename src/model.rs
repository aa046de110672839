use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Membre du personnel. Simple enregistrement : la capacité à recevoir des
/// notifications vit dans `notification::StaffObserver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
}

impl Staff {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
        }
    }

    pub fn with_id<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
        }
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Créneau à pourvoir (UTC). `staff` reste vide tant qu'aucune stratégie
/// n'est passée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub staff: Option<StaffId>,
    /// Pointage d'arrivée.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_in_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_out_at: Option<DateTime<Utc>>,
}

impl Shift {
    /// Crée un shift en validant que `end > start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        Ok(Self {
            id: ShiftId::random(),
            start,
            end,
            staff: None,
            clocked_in_at: None,
            clocked_out_at: None,
        })
    }

    pub fn assigned_to(mut self, staff: &StaffId) -> Self {
        self.staff = Some(staff.clone());
        self
    }

    /// Jour calendaire (UTC) du début du shift.
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Durée en minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn clock_in(&mut self, at: DateTime<Utc>) -> Result<(), String> {
        if self.clocked_in_at.is_some() {
            return Err("shift already clocked in".to_string());
        }
        self.clocked_in_at = Some(at);
        Ok(())
    }

    pub fn clock_out(&mut self, at: DateTime<Utc>) -> Result<(), String> {
        let Some(arrived) = self.clocked_in_at else {
            return Err("shift not clocked in yet".to_string());
        };
        if self.clocked_out_at.is_some() {
            return Err("shift already clocked out".to_string());
        }
        if at < arrived {
            return Err("clock-out cannot precede clock-in".to_string());
        }
        self.clocked_out_at = Some(at);
        Ok(())
    }

    /// Minutes pointées, une fois le départ enregistré.
    pub fn worked_minutes(&self) -> Option<i64> {
        match (self.clocked_in_at, self.clocked_out_at) {
            (Some(arrived), Some(left)) => Some((left - arrived).num_minutes()),
            _ => None,
        }
    }
}

/// Identifiant d'un utilisateur créateur (clé entière côté persistance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    /// Créateur utilisé pour les plannings générés automatiquement.
    pub const SYSTEM: UserId = UserId(1);
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Planning : groupe nommé de shifts partageant une clé (souvent un jour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl Schedule {
    pub fn new<N: Into<String>>(name: N, created_by: UserId) -> Self {
        Self {
            id: ScheduleId::random(),
            name: name.into(),
            created_by,
            created_at: Utc::now(),
            shifts: Vec::new(),
        }
    }

    pub fn push_shift(&mut self, shift: Shift) {
        self.shifts.push(shift);
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }

    pub fn find_shift<'a>(&'a self, id: &ShiftId) -> Option<&'a Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterId(String);

impl RosterId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
