mod group;
mod single;

pub use group::GroupRosterFactory;
pub use single::SingleRosterFactory;

use crate::model::{Staff, StaffId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description d'un planning à construire, telle que reçue de l'extérieur.
/// Les champs sont lâches : la validation se fait dans la factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_by: Option<serde_json::Value>,
    #[serde(default)]
    pub shifts: Vec<ShiftDraft>,
}

impl ScheduleDraft {
    pub fn new<N: Into<String>>(name: N, created_by: u64) -> Self {
        Self {
            name: name.into(),
            created_by: Some(serde_json::Value::from(created_by)),
            shifts: Vec::new(),
        }
    }

    pub fn with_shift(mut self, shift: ShiftDraft) -> Self {
        self.shifts.push(shift);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftDraft {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub staff: Option<StaffRef>,
}

impl ShiftDraft {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, staff: StaffRef) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            staff: Some(staff),
        }
    }
}

/// Référence vers une personne : identifiant, identifiant numérique,
/// enregistrement existant (avec ou sans nom) ou nouvelle personne à créer.
///
/// L'ordre des variantes compte : un objet `{id, name}` est un
/// enregistrement existant, `{id}` seul aussi, `{name}` seul une création.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaffRef {
    Id(StaffId),
    Number(u64),
    Record { id: StaffKey, name: String },
    Key { id: StaffKey },
    Inline(NewStaff),
}

/// Identifiant tel qu'il arrive de l'extérieur : texte ou entier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaffKey {
    Text(String),
    Number(u64),
}

impl StaffKey {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    pub fn to_staff_id(&self) -> StaffId {
        match self {
            Self::Text(s) => StaffId::new(s.trim()),
            Self::Number(n) => StaffId::new(n.to_string()),
        }
    }
}

impl From<&Staff> for StaffRef {
    fn from(staff: &Staff) -> Self {
        Self::Record {
            id: StaffKey::Text(staff.id.as_str().to_string()),
            name: staff.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStaff {
    pub name: String,
}
