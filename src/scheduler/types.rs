use serde::{Deserialize, Serialize};

/// Noms publiés des stratégies intégrées. Ne jamais les renommer : les
/// appelants les persistent.
pub const EVEN_DISTRIBUTION: &str = "even_distribution";
pub const MINIMIZE_DAY: &str = "minimize_day";
pub const DAY_NIGHT_BALANCED: &str = "day_night_balanced";

/// Plage horaire locale considérée comme « jour » : `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    /// Décalage de l'heure locale par rapport à UTC.
    pub utc_offset_minutes: i32,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 18,
            utc_offset_minutes: 0,
        }
    }
}

impl DayWindow {
    pub fn validate(&self) -> Result<(), String> {
        if self.start_hour >= 24 || self.end_hour > 24 {
            return Err("day window hours must be within 0..=24".to_string());
        }
        if self.start_hour >= self.end_hour {
            return Err("day window start_hour must be before end_hour".to_string());
        }
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err("utc_offset_minutes must be within one day".to_string());
        }
        Ok(())
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Day,
    Night,
}
