//! Error types for scenario validation.
//!
//! A tolerance breach is not an error: it is reported through
//! [`ValidationOutcome`](crate::report::ValidationOutcome) on a complete report.

use pricer_core::types::GridError;
use pricer_greeks::{GreekMethod, GreeksConfigError, GreeksError};
use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

/// Scenario validation errors. Any of these fails the whole run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A calculator failed at one grid point; partial results are discarded.
    #[error("Grid point S = {spot} failed for {method}: {source}")]
    GridPointFailed {
        /// Spot of the failing grid point
        spot: f64,
        /// Method that failed
        method: GreekMethod,
        /// Underlying calculator failure
        source: GreeksError,
    },

    /// Scenario definition is unusable.
    #[error("Invalid scenario: {reason}")]
    InvalidScenario {
        /// Description of the problem
        reason: String,
    },

    /// Tolerances are non-positive or do not keep Gamma looser than Delta.
    #[error("Invalid tolerances: delta = {delta}, gamma = {gamma} ({reason})")]
    InvalidTolerances {
        /// Delta tolerance
        delta: f64,
        /// Gamma tolerance
        gamma: f64,
        /// Violated rule
        reason: &'static str,
    },

    /// Step-size configuration rejected.
    #[error(transparent)]
    Config(#[from] GreeksConfigError),
}

impl From<GridError> for ValidationError {
    fn from(err: GridError) -> Self {
        ValidationError::InvalidScenario {
            reason: err.to_string(),
        }
    }
}

impl From<AnalyticalError> for ValidationError {
    fn from(err: AnalyticalError) -> Self {
        ValidationError::InvalidScenario {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_point_failed_display() {
        let err = ValidationError::GridPointFailed {
            spot: 0.5,
            method: GreekMethod::FiniteDifference,
            source: GreeksError::InvalidStepSize {
                method: GreekMethod::FiniteDifference,
                spot: 0.5,
                step: 0.0,
            },
        };
        let message = err.to_string();
        assert!(message.starts_with("Grid point S = 0.5 failed for FiniteDifference"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_grid_error_maps_to_invalid_scenario() {
        let err: ValidationError = GridError::InsufficientPoints { got: 1, need: 2 }.into();
        assert!(matches!(err, ValidationError::InvalidScenario { .. }));
    }
}
