use super::{ScheduleDraft, SingleRosterFactory};
use crate::error::{Result, RosterError};
use crate::model::{Shift, Staff};
use crate::roster::{Roster, RosterOptions};
use crate::scheduler::{Strategy, StrategyRegistry};
use crate::storage::{Persistence, Record};
use std::sync::Arc;

/// Construit des rosters complets : à partir d'un lot de descriptions, ou
/// d'une stratégie choisie par son nom.
///
/// Un lot est une transaction : au premier échec, tout ce qui a été ajouté
/// au stockage pendant l'opération est annulé.
#[derive(Debug, Clone)]
pub struct GroupRosterFactory {
    single: SingleRosterFactory,
    registry: Arc<StrategyRegistry>,
    options: RosterOptions,
}

impl GroupRosterFactory {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self {
            single: SingleRosterFactory::new(),
            registry,
            options: RosterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RosterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn strategy(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.registry.resolve(name)
    }

    /// Un planning par description, sans stockage.
    pub fn create(&self, drafts: &[ScheduleDraft], group_name: Option<&str>) -> Result<Roster> {
        self.build(drafts, group_name, None)
    }

    /// Comme `create`, en ajoutant le roster au stockage (commit si demandé).
    pub fn create_in(
        &self,
        drafts: &[ScheduleDraft],
        group_name: Option<&str>,
        store: &mut dyn Persistence,
        commit: bool,
    ) -> Result<Roster> {
        let outcome = self
            .build(drafts, group_name, Some(&mut *store))
            .and_then(|roster| persist(roster, &mut *store, commit));
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "group creation rolled back");
            store.rollback();
        }
        outcome
    }

    fn build(
        &self,
        drafts: &[ScheduleDraft],
        group_name: Option<&str>,
        mut store: Option<&mut (dyn Persistence + '_)>,
    ) -> Result<Roster> {
        let roster = Roster::new(group_name.map(str::to_string)).with_options(self.options);
        for (idx, draft) in drafts.iter().enumerate() {
            let schedule = self
                .single
                .create(draft, store.as_deref_mut())
                .map_err(|err| match err {
                    RosterError::Validation(v) => RosterError::Validation(v.in_schedule(idx)),
                    other => other,
                })?;
            roster.add_schedule(schedule);
        }
        Ok(roster)
    }

    /// Résout la stratégie, valide les entrées puis l'exécute.
    pub fn create_with_strategy(
        &self,
        strategy_name: &str,
        shifts: &[Shift],
        staff: &[Staff],
        group_name: Option<&str>,
    ) -> Result<Roster> {
        self.run_strategy(strategy_name, shifts, staff, group_name)
    }

    pub fn create_with_strategy_in(
        &self,
        strategy_name: &str,
        shifts: &[Shift],
        staff: &[Staff],
        group_name: Option<&str>,
        store: &mut dyn Persistence,
        commit: bool,
    ) -> Result<Roster> {
        let outcome = self
            .run_strategy(strategy_name, shifts, staff, group_name)
            .and_then(|roster| persist(roster, &mut *store, commit));
        if let Err(err) = &outcome {
            tracing::warn!(strategy = strategy_name, error = %err, "strategy run rolled back");
            store.rollback();
        }
        outcome
    }

    fn run_strategy(
        &self,
        strategy_name: &str,
        shifts: &[Shift],
        staff: &[Staff],
        group_name: Option<&str>,
    ) -> Result<Roster> {
        if strategy_name.trim().is_empty() {
            return Err(RosterError::invalid_input("strategy name must be a non-empty string"));
        }
        let strategy = self.registry.require(strategy_name)?;
        if shifts.is_empty() {
            return Err(RosterError::invalid_input("shifts list cannot be empty"));
        }
        if staff.is_empty() {
            return Err(RosterError::invalid_input("staff list cannot be empty"));
        }

        let roster = strategy.generate(shifts, staff)?.with_options(self.options);
        if let Some(name) = group_name {
            roster.rename(name);
        }
        tracing::info!(
            strategy = strategy_name,
            schedules = roster.schedule_count(),
            shifts = roster.shift_count(),
            "roster generated"
        );
        Ok(roster)
    }
}

fn persist(roster: Roster, store: &mut (dyn Persistence + '_), commit: bool) -> Result<Roster> {
    store
        .add(Record::Roster(roster.snapshot()))
        .map_err(RosterError::Persistence)?;
    if commit {
        store.commit().map_err(RosterError::Persistence)?;
    }
    Ok(roster)
}
