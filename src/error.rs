//! Error types
//!
//! The simulation has no fallible I/O. `SimError` covers invariant violations
//! (a caller holding a removed handle, a tuning that can't be simulated);
//! `ConfigError` covers loading tuning files.

use thiserror::Error;

use crate::sim::ShapeHandle;

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The handle was removed from the spatial index (or never belonged to it)
    #[error("stale shape handle: {0:?}")]
    StaleHandle(ShapeHandle),
    /// Tuning values that would make the simulation ill-defined
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Errors raised while loading tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parsed but failed validation
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::InvalidTuning(err.to_string())
    }
}
