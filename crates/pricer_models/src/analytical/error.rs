//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors raised by the Black-Scholes pricing kernel

use thiserror::Error;

/// Analytical pricing errors.
///
/// Provides structured error handling for the pricing kernel with the
/// offending value attached to each failure mode.
///
/// # Variants
/// - `InvalidParameters`: A market input is outside its valid domain
/// - `KernelEvaluationFailure`: The kernel produced a non-finite price
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidParameters { parameter: "strike", value: -1.0 };
/// assert!(format!("{}", err).contains("strike"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Non-positive spot or strike, negative expiry or volatility, or any
    /// non-finite input.
    #[error("Invalid parameters: {parameter} = {value}")]
    InvalidParameters {
        /// Name of the rejected input
        parameter: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The kernel returned NaN or infinity.
    #[error("Kernel evaluation failed at S = {spot}: {detail}")]
    KernelEvaluationFailure {
        /// Real part of the spot at which evaluation failed
        spot: f64,
        /// Description of the non-finite result
        detail: String,
    },
}

impl AnalyticalError {
    /// Creates an `InvalidParameters` error.
    pub fn invalid(parameter: &'static str, value: f64) -> Self {
        Self::InvalidParameters { parameter, value }
    }
}
