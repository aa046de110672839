use super::{DayNightBalance, DayWindow, EvenDistribution, MinimizeDays, Strategy};
use crate::error::{Result, RosterError};
use crate::model::UserId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Table nom → stratégie. Pré-remplie avec les stratégies intégrées, ouverte
/// à l'enregistrement de nouvelles stratégies à l'exécution.
pub struct StrategyRegistry {
    strategies: RwLock<BTreeMap<String, Arc<dyn Strategy>>>,
}

impl StrategyRegistry {
    /// Registre vide, sans stratégie intégrée.
    pub fn empty() -> Self {
        Self {
            strategies: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registre avec les trois stratégies intégrées.
    pub fn with_builtins(creator: UserId, window: DayWindow) -> Self {
        let registry = Self::empty();
        let builtins: [Arc<dyn Strategy>; 3] = [
            Arc::new(EvenDistribution::new(creator)),
            Arc::new(MinimizeDays::new(creator)),
            Arc::new(DayNightBalance::new(creator, window)),
        ];
        for strategy in builtins {
            registry.register(strategy.name(), strategy);
        }
        registry
    }

    /// Enregistre `strategy` sous `name` et renvoie la stratégie remplacée.
    pub fn register<N: Into<String>>(
        &self,
        name: N,
        strategy: Arc<dyn Strategy>,
    ) -> Option<Arc<dyn Strategy>> {
        let name = name.into();
        let mut map = self
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = map.insert(name.clone(), strategy);
        if previous.is_some() {
            tracing::warn!(strategy = %name, "strategy replaced in registry");
        } else {
            tracing::info!(strategy = %name, "strategy registered");
        }
        previous
    }

    /// `None` si le nom est inconnu ; c'est à l'appelant de décider du rapport.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<dyn Strategy>> {
        self.resolve(name)
            .ok_or_else(|| RosterError::UnknownStrategy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Noms enregistrés, triés.
    pub fn names(&self) -> Vec<String> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins(UserId::SYSTEM, DayWindow::default())
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
