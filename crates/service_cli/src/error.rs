//! CLI error types

use std::path::PathBuf;

use pricer_greeks::GreeksError;
use pricer_validation::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `greeks` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Greeks(#[from] GreeksError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render {path}: {detail}")]
    Render { path: PathBuf, detail: String },

    #[error("Scenario '{scenario}' exceeded tolerance at {breaches} method/Greek pair(s)")]
    ToleranceExceeded { scenario: String, breaches: usize },
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
