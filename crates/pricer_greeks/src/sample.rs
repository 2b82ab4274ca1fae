//! Greek sample value type.

use crate::method::{GammaEstimator, GreekMethod};

/// Absolute perturbations used to produce a numerical sample.
///
/// These are the realised steps actually applied to the spot, so error
/// spikes in a sweep can be correlated with the step that caused them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepSizes {
    /// Step used for Delta.
    pub delta: f64,
    /// Step used for Gamma.
    pub gamma: f64,
}

/// Delta and Gamma at one spot, produced by one method.
///
/// Immutable once created; one sample exists per (spot, method) pair in a
/// validation run.
///
/// # Examples
///
/// ```rust
/// use pricer_greeks::{GammaEstimator, GreekMethod, GreekSample};
///
/// let sample = GreekSample::analytic(100.0, 0.5398, 0.0198);
/// assert_eq!(sample.method, GreekMethod::Analytic);
/// assert_eq!(sample.gamma_estimator, GammaEstimator::ClosedForm);
/// assert!(sample.steps.is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GreekSample {
    /// Spot price of the evaluation point.
    pub spot: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// Method that produced the sample.
    pub method: GreekMethod,
    /// Formula behind `gamma`.
    pub gamma_estimator: GammaEstimator,
    /// Realised steps; `None` for the closed form.
    pub steps: Option<StepSizes>,
}

impl GreekSample {
    /// Creates a closed-form sample.
    pub fn analytic(spot: f64, delta: f64, gamma: f64) -> Self {
        Self {
            spot,
            delta,
            gamma,
            method: GreekMethod::Analytic,
            gamma_estimator: GammaEstimator::ClosedForm,
            steps: None,
        }
    }
}

/// A single numerical derivative together with the step that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    /// Derivative value.
    pub value: f64,
    /// Realised absolute step.
    pub step: f64,
}
