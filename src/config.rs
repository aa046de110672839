use crate::model::UserId;
use crate::roster::RosterOptions;
use crate::scheduler::{DayWindow, StrategyRegistry, EVEN_DISTRIBUTION};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Réglages du moteur, chargés depuis un fichier JSON (tous les champs ont
/// une valeur par défaut).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_strategy: String,
    pub notify_on_remove: bool,
    pub day_window: DayWindow,
    /// Créateur inscrit sur les plannings produits par les stratégies.
    pub creator: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_strategy: EVEN_DISTRIBUTION.to_string(),
            notify_on_remove: true,
            day_window: DayWindow::default(),
            creator: UserId::SYSTEM.0,
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_slice(&data)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_strategy.trim().is_empty() {
            bail!("default_strategy cannot be empty");
        }
        self.day_window.validate().map_err(anyhow::Error::msg)?;
        Ok(())
    }

    pub fn roster_options(&self) -> RosterOptions {
        RosterOptions {
            notify_on_remove: self.notify_on_remove,
        }
    }

    /// Registre des stratégies intégrées, paramétré par ces réglages.
    pub fn registry(&self) -> StrategyRegistry {
        StrategyRegistry::with_builtins(UserId(self.creator), self.day_window)
    }
}
