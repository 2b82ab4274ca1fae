//! Complex-step Greeks.
//!
//! The pricing kernel is analytic in the spot, so for a real step h:
//!
//! V(S + ih) = V(S) − h²/2·V''(S) + O(h⁴) + i·(h·V'(S) − h³/6·V'''(S) + O(h⁵))
//!
//! ## Delta
//!
//! Delta = Im V(S + ih) / h. No two evaluations are subtracted, so there is
//! no cancellation and h can be many orders of magnitude below the
//! finite-difference step (default 1e-20·S). Accuracy tracks the closed form
//! to near machine precision.
//!
//! ## Gamma (hybrid estimator)
//!
//! The imaginary part carries no second-derivative information. Gamma is
//! taken from the real part:
//!
//! Gamma ≈ 2·(V(S) − Re V(S + ih)) / h²
//!
//! This subtracts a real evaluation, so it is a hybrid complex-step/real
//! estimator with the same cancellation sensitivity and O(h²) truncation as a
//! central second difference. It uses its own finite-difference sized step
//! and is tagged [`GammaEstimator::HybridComplexStep`] wherever it is
//! reported. It does not share the cancellation-free guarantee of Delta.
//!
//! ## 45° estimator
//!
//! With ω = e^(iπ/4), ω² = i, so Im(V(S + hω) + V(S − hω)) = h²·V''(S) + O(h⁶).
//! [`ComplexStepGreeks::gamma_forty_five`] exposes this alternative for step
//! studies; it is never used for the `ComplexStep` method tag.

use num_complex::Complex64;
use pricer_models::analytical::{BlackScholes, BlackScholesParams};
use tracing::trace;

use crate::calculator::GreeksCalculator;
use crate::config::GreeksConfig;
use crate::error::GreeksError;
use crate::method::{GammaEstimator, GreekMethod};
use crate::sample::{Estimate, GreekSample, StepSizes};

/// Complex-step Greeks calculator.
///
/// # Examples
/// ```
/// use pricer_greeks::{ComplexStepGreeks, GreeksConfig};
/// use pricer_models::analytical::BlackScholesParams;
///
/// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
/// let cs = ComplexStepGreeks::from_config(&GreeksConfig::default());
///
/// let delta = cs.delta(&params).unwrap();
/// assert!((delta.value - 0.539827837277029).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexStepGreeks {
    delta_step_relative: f64,
    gamma_step_relative: f64,
}

impl ComplexStepGreeks {
    /// Creates a calculator from relative Delta and Gamma steps.
    pub fn new(delta_step_relative: f64, gamma_step_relative: f64) -> Self {
        Self {
            delta_step_relative,
            gamma_step_relative,
        }
    }

    /// Creates a calculator from the complex-step part of `config`.
    pub fn from_config(config: &GreeksConfig) -> Self {
        Self::new(config.cs_delta_step_relative, config.cs_gamma_step_relative)
    }

    /// Delta with the configured relative step.
    pub fn delta(&self, params: &BlackScholesParams) -> Result<Estimate, GreeksError> {
        self.delta_with_step(params, self.delta_step_relative * params.spot())
    }

    /// Hybrid Gamma with the configured relative step.
    pub fn gamma(&self, params: &BlackScholesParams) -> Result<Estimate, GreeksError> {
        self.gamma_with_step(params, self.gamma_step_relative * params.spot())
    }

    /// Delta = Im V(S + ih) / h with an explicit absolute step.
    ///
    /// # Errors
    /// `InvalidStepSize` if h is zero, subnormal or non-finite.
    pub fn delta_with_step(
        &self,
        params: &BlackScholesParams,
        step: f64,
    ) -> Result<Estimate, GreeksError> {
        let spot = params.spot();
        if !(step > 0.0 && step.is_normal()) {
            return Err(invalid_step(spot, step));
        }

        let value = BlackScholes::new(*params).price_call_at(Complex64::new(spot, step))?;
        Ok(Estimate {
            value: value.im / step,
            step,
        })
    }

    /// Hybrid Gamma = 2·(V(S) − Re V(S + ih)) / h² with an explicit absolute step.
    ///
    /// # Errors
    /// `InvalidStepSize` if h² is zero, subnormal or non-finite.
    pub fn gamma_with_step(
        &self,
        params: &BlackScholesParams,
        step: f64,
    ) -> Result<Estimate, GreeksError> {
        let spot = params.spot();
        let h_squared = step * step;
        if !(step > 0.0 && h_squared.is_normal()) {
            return Err(invalid_step(spot, step));
        }

        let kernel = BlackScholes::new(*params);
        let base = kernel.price_call_at(spot)?;
        let shifted = kernel.price_call_at(Complex64::new(spot, step))?;

        Ok(Estimate {
            value: 2.0 * (base - shifted.re) / h_squared,
            step,
        })
    }

    /// 45° complex-step Gamma = Im(V(S + hω) + V(S − hω)) / h², ω = e^(iπ/4).
    ///
    /// # Errors
    /// `InvalidStepSize` if h² is zero, subnormal or non-finite, or if
    /// S − h/√2 is not positive.
    pub fn gamma_forty_five(
        &self,
        params: &BlackScholesParams,
        step: f64,
    ) -> Result<Estimate, GreeksError> {
        let spot = params.spot();
        let h_squared = step * step;
        let offset = Complex64::new(step, step) * std::f64::consts::FRAC_1_SQRT_2;
        if !(step > 0.0 && h_squared.is_normal() && spot - offset.re > 0.0) {
            return Err(invalid_step(spot, step));
        }

        let kernel = BlackScholes::new(*params);
        let up = kernel.price_call_at(Complex64::new(spot, 0.0) + offset)?;
        let down = kernel.price_call_at(Complex64::new(spot, 0.0) - offset)?;

        Ok(Estimate {
            value: (up.im + down.im) / h_squared,
            step,
        })
    }
}

fn invalid_step(spot: f64, step: f64) -> GreeksError {
    trace!(spot, step, "degenerate complex step");
    GreeksError::InvalidStepSize {
        method: GreekMethod::ComplexStep,
        spot,
        step,
    }
}

impl Default for ComplexStepGreeks {
    fn default() -> Self {
        Self::from_config(&GreeksConfig::default())
    }
}

impl GreeksCalculator for ComplexStepGreeks {
    fn method(&self) -> GreekMethod {
        GreekMethod::ComplexStep
    }

    fn sample(&self, params: &BlackScholesParams) -> Result<GreekSample, GreeksError> {
        let delta = self.delta(params)?;
        let gamma = self.gamma(params)?;

        Ok(GreekSample {
            spot: params.spot(),
            delta: delta.value,
            gamma: gamma.value,
            method: GreekMethod::ComplexStep,
            gamma_estimator: GammaEstimator::HybridComplexStep,
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

    fn params(spot: f64, vol: f64, expiry: f64) -> BlackScholesParams {
        BlackScholesParams::new(spot, 100.0, 0.0, 0.0, vol, expiry).unwrap()
    }

    // ==========================================================
    // Delta
    // ==========================================================

    #[test]
    fn test_delta_matches_analytic_to_machine_precision() {
        for spot in [60.0, 90.0, 100.0, 110.0, 140.0] {
            let p = params(spot, 0.2, 1.0);
            let delta = ComplexStepGreeks::default().delta(&p).unwrap();
            assert_relative_eq!(delta.value, AnalyticGreeks.delta(&p), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_delta_insensitive_to_step_magnitude() {
        let p = params(100.0, 0.2, 1.0);
        let cs = ComplexStepGreeks::default();
        let reference = AnalyticGreeks.delta(&p);
        for step in [1e-100, 1e-30, 1e-18, 1e-10] {
            let delta = cs.delta_with_step(&p, step).unwrap();
            assert_relative_eq!(delta.value, reference, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_delta_with_rates_and_dividend() {
        let p = BlackScholesParams::new(95.0, 100.0, 0.05, 0.02, 0.25, 0.5).unwrap();
        let delta = ComplexStepGreeks::default().delta(&p).unwrap();
        assert_relative_eq!(delta.value, AnalyticGreeks.delta(&p), max_relative = 1e-12);
    }

    #[test]
    fn test_delta_rejects_degenerate_step() {
        let p = params(100.0, 0.2, 1.0);
        let cs = ComplexStepGreeks::default();
        for step in [0.0, -1e-20, 1e-320, f64::NAN] {
            match cs.delta_with_step(&p, step) {
                Err(GreeksError::InvalidStepSize { method, .. }) => {
                    assert_eq!(method, GreekMethod::ComplexStep)
                }
                other => panic!("Expected InvalidStepSize, got {:?}", other),
            }
        }
    }

    // ==========================================================
    // Gamma
    // ==========================================================

    #[test]
    fn test_hybrid_gamma_matches_analytic() {
        let p = params(100.0, 0.2, 1.0);
        let gamma = ComplexStepGreeks::default().gamma(&p).unwrap();
        assert_relative_eq!(gamma.value, AnalyticGreeks.gamma(&p), max_relative = 1e-6);
    }

    #[test]
    fn test_hybrid_gamma_degrades_with_tiny_step() {
        // The Delta step is far too small for the hybrid estimator
        let p = params(100.0, 0.2, 1.0);
        let result = ComplexStepGreeks::default().gamma_with_step(&p, 1e-18);
        match result {
            Ok(estimate) => {
                let error = (estimate.value - AnalyticGreeks.gamma(&p)).abs();
                assert!(error > 1e-3);
            }
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    #[test]
    fn test_forty_five_degree_gamma() {
        let p = params(100.0, 0.2, 1.0);
        let cs = ComplexStepGreeks::default();
        let gamma = cs.gamma_forty_five(&p, 1e-2).unwrap();
        assert_relative_eq!(gamma.value, AnalyticGreeks.gamma(&p), max_relative = 1e-8);
    }

    #[test]
    fn test_forty_five_degree_rejects_crossing_zero() {
        let p = params(1.0, 0.2, 1.0);
        let result = ComplexStepGreeks::default().gamma_forty_five(&p, 2.0);
        assert!(matches!(result, Err(GreeksError::InvalidStepSize { .. })));
    }

    #[test]
    fn test_sample_is_labelled_hybrid() {
        let sample = ComplexStepGreeks::default()
            .sample(&params(100.0, 0.2, 1.0))
            .unwrap();
        assert_eq!(sample.method, GreekMethod::ComplexStep);
        assert_eq!(sample.gamma_estimator, GammaEstimator::HybridComplexStep);
        assert_relative_eq!(sample.steps.unwrap().delta, 1e-18, max_relative = 1e-15);
    }

    // ==========================================================
    // Degenerate boundary
    // ==========================================================

    #[test]
    fn test_expiry_zero_step_behaviour() {
        let cs = ComplexStepGreeks::default();
        let itm = cs.sample(&params(110.0, 0.2, 0.0)).unwrap();
        let otm = cs.sample(&params(90.0, 0.2, 0.0)).unwrap();
        assert_relative_eq!(itm.delta, 1.0, epsilon = 1e-15);
        assert_eq!(itm.gamma, 0.0);
        assert_eq!(otm.delta, 0.0);
        assert_eq!(otm.gamma, 0.0);
    }
}
