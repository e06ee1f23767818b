//! Error types for the scoring engine

use thiserror::Error;

use crate::league::League;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, JpredError>;

/// Errors that abort a run.
///
/// Per-slot problems (unknown teams, missing picks) are never errors; they
/// score zero and surface as [`crate::scorer::Anomaly`] values instead.
#[derive(Error, Debug)]
pub enum JpredError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Slot definitions or standings are structurally broken
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file is readable but not in the expected shape
    #[error("Invalid input: {0}")]
    Input(String),
}

impl JpredError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn standings(league: League, msg: impl std::fmt::Display) -> Self {
        Self::Config(format!("{} standings: {}", league, msg))
    }
}
