//! Bump-and-revalue Greeks on real spot perturbations.
//!
//! ## Step size and the cancellation floor
//!
//! Total error is truncation plus rounding:
//! - central Delta: O(h²) + O(ε·V/h), minimised near h = S·ε^(1/3)
//! - central Gamma: O(h²) + O(ε·V/h²), minimised near h = S·ε^(1/4)
//!
//! Below the optimum the rounding term dominates, so shrinking h further
//! makes the result worse, not better. Every estimate therefore carries the
//! step actually used.
//!
//! The step is realised as `(S + h) − S`, the exact distance between the two
//! representable spots. If that distance is zero the calculator fails with
//! [`GreeksError::InvalidStepSize`] instead of dividing by zero.

use pricer_models::analytical::{BlackScholes, BlackScholesParams};
use tracing::trace;

use crate::calculator::GreeksCalculator;
use crate::config::{DifferenceScheme, GreeksConfig};
use crate::error::GreeksError;
use crate::method::{GammaEstimator, GreekMethod};
use crate::sample::{Estimate, GreekSample, StepSizes};

/// Finite-difference Greeks calculator.
///
/// # Examples
/// ```
/// use pricer_greeks::{FiniteDifferenceGreeks, GreeksConfig};
/// use pricer_models::analytical::BlackScholesParams;
///
/// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
/// let fd = FiniteDifferenceGreeks::from_config(&GreeksConfig::default());
///
/// let delta = fd.delta(&params).unwrap();
/// assert!((delta.value - 0.539827837277029).abs() < 1e-8);
/// assert!(delta.step > 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiniteDifferenceGreeks {
    delta_step_relative: f64,
    gamma_step_relative: f64,
    scheme: DifferenceScheme,
}

impl FiniteDifferenceGreeks {
    /// Creates a calculator from relative steps and a stencil.
    pub fn new(delta_step_relative: f64, gamma_step_relative: f64, scheme: DifferenceScheme) -> Self {
        Self {
            delta_step_relative,
            gamma_step_relative,
            scheme,
        }
    }

    /// Creates a calculator from the finite-difference part of `config`.
    pub fn from_config(config: &GreeksConfig) -> Self {
        Self::new(
            config.fd_delta_step_relative,
            config.fd_gamma_step_relative,
            config.scheme,
        )
    }

    /// Returns the stencil.
    pub fn scheme(&self) -> DifferenceScheme {
        self.scheme
    }

    /// Gamma estimator implied by the stencil.
    pub fn gamma_estimator(&self) -> GammaEstimator {
        match self.scheme {
            DifferenceScheme::Central => GammaEstimator::CentralSecondDifference,
            DifferenceScheme::Forward => GammaEstimator::ForwardSecondDifference,
        }
    }

    /// Delta with the configured relative step.
    pub fn delta(&self, params: &BlackScholesParams) -> Result<Estimate, GreeksError> {
        self.delta_with_step(params, self.delta_step_relative * params.spot())
    }

    /// Gamma with the configured relative step.
    pub fn gamma(&self, params: &BlackScholesParams) -> Result<Estimate, GreeksError> {
        self.gamma_with_step(params, self.gamma_step_relative * params.spot())
    }

    /// Delta with an explicit absolute step.
    ///
    /// # Errors
    /// `InvalidStepSize` if the realised step is zero, non-finite, or moves a
    /// bumped spot out of the positive half-line.
    pub fn delta_with_step(
        &self,
        params: &BlackScholesParams,
        step: f64,
    ) -> Result<Estimate, GreeksError> {
        let spot = params.spot();
        let h = self.realise_step(spot, step)?;
        let kernel = BlackScholes::new(*params);

        let value = match self.scheme {
            DifferenceScheme::Central => {
                let up = kernel.price_call_at(spot + h)?;
                let down = kernel.price_call_at(spot - h)?;
                (up - down) / (2.0 * h)
            }
            DifferenceScheme::Forward => {
                let up = kernel.price_call_at(spot + h)?;
                let base = kernel.price_call_at(spot)?;
                (up - base) / h
            }
        };

        Ok(Estimate { value, step: h })
    }

    /// Gamma with an explicit absolute step.
    ///
    /// # Errors
    /// Same conditions as [`Self::delta_with_step`].
    pub fn gamma_with_step(
        &self,
        params: &BlackScholesParams,
        step: f64,
    ) -> Result<Estimate, GreeksError> {
        let spot = params.spot();
        let h = self.realise_step(spot, step)?;
        let kernel = BlackScholes::new(*params);
        let base = kernel.price_call_at(spot)?;

        let value = match self.scheme {
            DifferenceScheme::Central => {
                let up = kernel.price_call_at(spot + h)?;
                let down = kernel.price_call_at(spot - h)?;
                (up - 2.0 * base + down) / (h * h)
            }
            DifferenceScheme::Forward => {
                let up = kernel.price_call_at(spot + h)?;
                let up2 = kernel.price_call_at(spot + 2.0 * h)?;
                (up2 - 2.0 * up + base) / (h * h)
            }
        };

        Ok(Estimate { value, step: h })
    }

    fn realise_step(&self, spot: f64, step: f64) -> Result<f64, GreeksError> {
        let h = (spot + step) - spot;
        let h_squared = h * h;
        let below_spot = match self.scheme {
            DifferenceScheme::Central => spot - h > 0.0,
            DifferenceScheme::Forward => true,
        };

        if h > 0.0 && h.is_finite() && h_squared.is_normal() && below_spot {
            Ok(h)
        } else {
            trace!(spot, step, realised = h, "degenerate finite-difference step");
            Err(GreeksError::InvalidStepSize {
                method: GreekMethod::FiniteDifference,
                spot,
                step: h,
            })
        }
    }
}

impl Default for FiniteDifferenceGreeks {
    fn default() -> Self {
        Self::from_config(&GreeksConfig::default())
    }
}

impl GreeksCalculator for FiniteDifferenceGreeks {
    fn method(&self) -> GreekMethod {
        GreekMethod::FiniteDifference
    }

    fn sample(&self, params: &BlackScholesParams) -> Result<GreekSample, GreeksError> {
        let delta = self.delta(params)?;
        let gamma = self.gamma(params)?;

        Ok(GreekSample {
            spot: params.spot(),
            delta: delta.value,
            gamma: gamma.value,
            method: GreekMethod::FiniteDifference,
            gamma_estimator: self.gamma_estimator(),
            steps: Some(StepSizes {
                delta: delta.step,
                gamma: gamma.step,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::AnalyticGreeks;
    use approx::assert_relative_eq;

    fn atm() -> BlackScholesParams {
        BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap()
    }

    fn forward() -> FiniteDifferenceGreeks {
        let config = GreeksConfig::builder()
            .scheme(DifferenceScheme::Forward)
            .build()
            .unwrap();
        FiniteDifferenceGreeks::from_config(&config)
    }

    // ==========================================================
    // Central scheme
    // ==========================================================

    #[test]
    fn test_central_delta_matches_analytic() {
        let p = atm();
        let delta = FiniteDifferenceGreeks::default().delta(&p).unwrap();
        assert_relative_eq!(delta.value, AnalyticGreeks.delta(&p), max_relative = 1e-9);
    }

    #[test]
    fn test_central_gamma_matches_analytic() {
        let p = atm();
        let gamma = FiniteDifferenceGreeks::default().gamma(&p).unwrap();
        assert_relative_eq!(gamma.value, AnalyticGreeks.gamma(&p), max_relative = 1e-6);
    }

    #[test]
    fn test_step_is_exposed_and_representable() {
        let p = atm();
        let delta = FiniteDifferenceGreeks::default().delta(&p).unwrap();
        assert_eq!((100.0 + delta.step) - 100.0, delta.step);
        assert_relative_eq!(delta.step, 100.0 * f64::EPSILON.cbrt(), max_relative = 1e-10);
    }

    #[test]
    fn test_sample_carries_steps_and_estimator() {
        let sample = FiniteDifferenceGreeks::default().sample(&atm()).unwrap();
        assert_eq!(sample.method, GreekMethod::FiniteDifference);
        assert_eq!(sample.gamma_estimator, GammaEstimator::CentralSecondDifference);
        let steps = sample.steps.unwrap();
        assert!(steps.gamma > steps.delta);
    }

    // ==========================================================
    // Forward scheme
    // ==========================================================

    #[test]
    fn test_forward_delta_is_first_order() {
        let p = atm();
        let analytic = AnalyticGreeks.delta(&p);
        let estimate = forward().delta(&p).unwrap();
        // O(h) truncation: h·Γ/2 ≈ 6e-4·0.02/2
        assert!((estimate.value - analytic).abs() < 1e-5);
        assert!((estimate.value - analytic).abs() > 1e-9);
    }

    #[test]
    fn test_forward_gamma_estimator_tag() {
        let sample = forward().sample(&atm()).unwrap();
        assert_eq!(sample.gamma_estimator, GammaEstimator::ForwardSecondDifference);
        assert_relative_eq!(sample.gamma, AnalyticGreeks.gamma(&atm()), max_relative = 1e-3);
    }

    // ==========================================================
    // Degenerate steps
    // ==========================================================

    #[test]
    fn test_step_below_resolution_is_rejected() {
        let p = atm();
        // 1e-15 < ulp(100)/2: S + h rounds back to S
        let result = FiniteDifferenceGreeks::default().delta_with_step(&p, 1e-15);
        match result {
            Err(GreeksError::InvalidStepSize { method, spot, step }) => {
                assert_eq!(method, GreekMethod::FiniteDifference);
                assert_eq!(spot, 100.0);
                assert_eq!(step, 0.0);
            }
            other => panic!("Expected InvalidStepSize, got {:?}", other),
        }
    }

    #[test]
    fn test_tiny_spot_underflows_step() {
        let p = BlackScholesParams::new(1e-310, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
        let result = FiniteDifferenceGreeks::default().sample(&p);
        assert!(matches!(result, Err(GreeksError::InvalidStepSize { .. })));
    }

    #[test]
    fn test_central_step_cannot_cross_zero() {
        let p = atm();
        let result = FiniteDifferenceGreeks::default().delta_with_step(&p, 100.0);
        assert!(matches!(result, Err(GreeksError::InvalidStepSize { .. })));
        // Forward scheme never evaluates below the spot
        assert!(forward().delta_with_step(&p, 100.0).is_ok());
    }

    #[test]
    fn test_expiry_zero_away_from_strike() {
        let fd = FiniteDifferenceGreeks::default();
        let itm = BlackScholesParams::new(110.0, 100.0, 0.0, 0.0, 0.2, 0.0).unwrap();
        let otm = BlackScholesParams::new(90.0, 100.0, 0.0, 0.0, 0.2, 0.0).unwrap();
        assert_relative_eq!(fd.delta(&itm).unwrap().value, 1.0, epsilon = 1e-9);
        assert_eq!(fd.delta(&otm).unwrap().value, 0.0);
        assert_eq!(fd.gamma(&otm).unwrap().value, 0.0);
    }
}
