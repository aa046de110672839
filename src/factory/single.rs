use super::{ScheduleDraft, StaffRef};
use crate::error::{Result, RosterError, ValidationError};
use crate::model::{Schedule, Shift, Staff, StaffId, UserId};
use crate::storage::{Persistence, Record};
use chrono::{DateTime, Utc};

enum Assignee {
    Existing(StaffId),
    Create(String),
}

struct ValidShift {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    assignee: Assignee,
}

/// Construit un planning à partir d'une description.
///
/// Toute la description est validée avant le moindre effet de bord : une
/// erreur n'ajoute rien au stockage.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleRosterFactory;

impl SingleRosterFactory {
    pub fn new() -> Self {
        Self
    }

    /// Construit le planning ; les nouvelles personnes décrites en ligne
    /// sont ajoutées à `store` (sans commit).
    pub fn create(
        &self,
        draft: &ScheduleDraft,
        store: Option<&mut (dyn Persistence + '_)>,
    ) -> Result<Schedule> {
        let creator = validate_creator(draft)?;
        let shifts = draft
            .shifts
            .iter()
            .enumerate()
            .map(|(idx, shift)| validate_shift(idx, shift))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut store = store;
        let mut schedule = Schedule::new(draft.name.clone(), creator);
        for (idx, valid) in shifts.into_iter().enumerate() {
            let staff_id = match valid.assignee {
                Assignee::Existing(id) => id,
                Assignee::Create(name) => {
                    let staff = Staff::new(name);
                    let id = staff.id.clone();
                    if let Some(store) = store.as_deref_mut() {
                        store
                            .add(Record::Staff(staff))
                            .map_err(RosterError::Persistence)?;
                    }
                    id
                }
            };
            let shift = Shift::new(valid.start, valid.end)
                .map_err(|reason| ValidationError::at_shift(idx, reason))?;
            schedule.push_shift(shift.assigned_to(&staff_id));
        }
        Ok(schedule)
    }

    /// Construit, ajoute le planning au stockage et, si demandé, commite.
    /// Toute erreur annule les ajouts de l'opération.
    pub fn create_in(
        &self,
        draft: &ScheduleDraft,
        store: &mut dyn Persistence,
        commit: bool,
    ) -> Result<Schedule> {
        let outcome = self.create(draft, Some(&mut *store)).and_then(|schedule| {
            store
                .add(Record::Schedule(schedule.clone()))
                .map_err(RosterError::Persistence)?;
            if commit {
                store.commit().map_err(RosterError::Persistence)?;
            }
            Ok(schedule)
        });
        if let Err(err) = &outcome {
            tracing::warn!(schedule = %draft.name, error = %err, "schedule creation rolled back");
            store.rollback();
        }
        outcome
    }
}

fn validate_creator(draft: &ScheduleDraft) -> std::result::Result<UserId, ValidationError> {
    let Some(raw) = draft.created_by.as_ref() else {
        return Err(ValidationError::new("created_by is required"));
    };
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .map(UserId)
        .ok_or_else(|| ValidationError::new(format!("created_by must be a non-negative integer, got {raw}")))
}

fn validate_shift(
    idx: usize,
    draft: &super::ShiftDraft,
) -> std::result::Result<ValidShift, ValidationError> {
    let start = draft
        .start
        .ok_or_else(|| ValidationError::at_shift(idx, "missing start time"))?;
    let end = draft
        .end
        .ok_or_else(|| ValidationError::at_shift(idx, "missing end time"))?;
    if end <= start {
        return Err(ValidationError::at_shift(idx, "end must be strictly after start"));
    }

    let assignee = match draft.staff.as_ref() {
        None => return Err(ValidationError::at_shift(idx, "missing staff assignment")),
        Some(StaffRef::Id(id)) if id.as_str().trim().is_empty() => {
            return Err(ValidationError::at_shift(idx, "staff id cannot be empty"))
        }
        Some(StaffRef::Id(id)) => Assignee::Existing(id.clone()),
        Some(StaffRef::Number(n)) => Assignee::Existing(StaffId::new(n.to_string())),
        Some(StaffRef::Record { id, .. } | StaffRef::Key { id }) if id.is_blank() => {
            return Err(ValidationError::at_shift(idx, "staff record has an empty id"))
        }
        Some(StaffRef::Record { id, .. } | StaffRef::Key { id }) => {
            Assignee::Existing(id.to_staff_id())
        }
        Some(StaffRef::Inline(new)) if new.name.trim().is_empty() => {
            return Err(ValidationError::at_shift(idx, "inline staff needs a name"))
        }
        Some(StaffRef::Inline(new)) => Assignee::Create(new.name.trim().to_string()),
    };

    Ok(ValidShift { start, end, assignee })
}
