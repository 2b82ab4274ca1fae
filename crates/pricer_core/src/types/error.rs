//! Error types for the numeric foundation.
//!
//! This module provides:
//! - `GridError`: Errors from evaluation grid construction

use thiserror::Error;

/// Grid construction errors.
///
/// # Examples
/// ```
/// use pricer_core::types::GridError;
///
/// let err = GridError::InsufficientPoints { got: 1, need: 2 };
/// assert_eq!(format!("{}", err), "Insufficient grid points: got 1, need at least 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// Fewer points than a grid with two endpoints needs.
    #[error("Insufficient grid points: got {got}, need at least {need}")]
    InsufficientPoints {
        /// Number of points requested
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Bounds are non-finite or not strictly increasing.
    #[error("Invalid grid range: [{min}, {max}]")]
    InvalidRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = GridError::InvalidRange { min: 2.0, max: 1.0 };
        assert_eq!(format!("{}", err), "Invalid grid range: [2, 1]");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = GridError::InsufficientPoints { got: 0, need: 2 };
        let _: &dyn std::error::Error = &err;
    }
}
