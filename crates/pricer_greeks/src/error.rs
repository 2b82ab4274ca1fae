//! Error types for Greeks calculation.

use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

use crate::method::GreekMethod;

/// Greeks calculation errors.
///
/// # Variants
/// - `InvalidStepSize`: the perturbation collapsed to zero (or left the
///   valid spot domain) after rounding
/// - `Kernel`: the pricing kernel rejected its inputs or returned a
///   non-finite price
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GreeksError {
    /// Degenerate perturbation; dividing by it would produce garbage.
    #[error("Invalid step size for {method} at S = {spot}: h = {step}")]
    InvalidStepSize {
        /// Calculator that rejected the step
        method: GreekMethod,
        /// Spot at which the step was formed
        spot: f64,
        /// The realised step after rounding
        step: f64,
    },

    /// Failure inside the pricing kernel.
    #[error(transparent)]
    Kernel(#[from] AnalyticalError),
}

impl GreeksError {
    /// Returns the spot associated with the failure, when known.
    pub fn spot(&self) -> Option<f64> {
        match self {
            GreeksError::InvalidStepSize { spot, .. } => Some(*spot),
            GreeksError::Kernel(AnalyticalError::KernelEvaluationFailure { spot, .. }) => {
                Some(*spot)
            }
            GreeksError::Kernel(AnalyticalError::InvalidParameters { parameter, value })
                if *parameter == "spot" =>
            {
                Some(*value)
            }
            GreeksError::Kernel(_) => None,
        }
    }
}
