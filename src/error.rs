use std::fmt;
use thiserror::Error;

/// Champ présent mais invalide, détecté pendant la construction d'un planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Position du planning dans un lot (factory de groupe).
    pub schedule: Option<usize>,
    /// Position du shift fautif dans son planning.
    pub shift: Option<usize>,
    pub reason: String,
}

impl ValidationError {
    pub fn new<R: Into<String>>(reason: R) -> Self {
        Self {
            schedule: None,
            shift: None,
            reason: reason.into(),
        }
    }

    pub fn at_shift<R: Into<String>>(shift: usize, reason: R) -> Self {
        Self {
            schedule: None,
            shift: Some(shift),
            reason: reason.into(),
        }
    }

    pub fn in_schedule(mut self, index: usize) -> Self {
        self.schedule = Some(index);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(idx) = self.schedule {
            write!(f, "schedule {idx}: ")?;
        }
        if let Some(idx) = self.shift {
            write!(f, "shift {idx}: ")?;
        }
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("persistence failure: {0:#}")]
    Persistence(#[source] anyhow::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RosterError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Vrai pour les erreurs que l'appelant peut retenter telles quelles.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
