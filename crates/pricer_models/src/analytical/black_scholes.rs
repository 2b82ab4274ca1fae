//! Black-Scholes pricing kernel for European calls.
//!
//! The kernel is the single numerical primitive of the Greeks engine: analytic
//! Greeks read its intermediate quantities, finite differences re-evaluate it
//! at bumped real spots, and complex-step differentiation evaluates it at a
//! complex spot. All of these go through one formula generic over [`Scalar`].
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(−qT)·Φ(d₁) − K·e^(−rT)·Φ(d₂)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r − q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ − σ√T
//!
//! evaluated in forward form, C = e^(−rT)·(F·Φ(d₁) − K·Φ(d₂)) with
//! F = S·e^((r−q)T), so the spot enters the formula exactly once.
//!
//! ## Degenerate cases
//!
//! When σ√T = 0 the formula divides by zero. The kernel returns the
//! deterministic payoff instead:
//! - T = 0: intrinsic value max(S − K, 0)
//! - σ = 0: discounted forward payoff e^(−rT)·max(F − K, 0)
//!
//! For complex spots the `max` branches on the real part of F, which keeps the
//! imaginary part equal to h·∂C/∂S on either side of the kink. The price has a
//! kink at F = K, so Delta is discontinuous there (see
//! `pricer_greeks::analytic`).

use pricer_core::math::Scalar;

use super::error::AnalyticalError;
use super::params::BlackScholesParams;

/// Black-Scholes European call pricer.
///
/// Wraps a validated [`BlackScholesParams`]; evaluation can happen at the
/// stored spot or at any other (real or complex) spot with the remaining
/// inputs held fixed.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{BlackScholes, BlackScholesParams};
///
/// let params = BlackScholesParams::new(100.0, 100.0, 0.05, 0.0, 0.2, 1.0).unwrap();
/// let price = BlackScholes::new(params).price_call().unwrap();
/// assert!((price - 10.450583572185565).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    params: BlackScholesParams,
}

impl BlackScholes {
    /// Creates a pricer over the given parameters.
    pub fn new(params: BlackScholesParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &BlackScholesParams {
        &self.params
    }

    /// Computes the d₁ term at the stored spot.
    ///
    /// Returns `None` in the degenerate case σ√T = 0, where d₁ is undefined.
    #[inline]
    pub fn d1(&self) -> Option<f64> {
        if self.params.is_degenerate() {
            return None;
        }
        Some(d1_at(&self.params, self.params.spot()))
    }

    /// Computes the d₂ term at the stored spot (`None` when degenerate).
    #[inline]
    pub fn d2(&self) -> Option<f64> {
        self.d1().map(|d1| d1 - self.params.vol_sqrt_t())
    }

    /// Call price at the stored spot.
    ///
    /// # Errors
    /// `KernelEvaluationFailure` if the result is not finite.
    pub fn price_call(&self) -> Result<f64, AnalyticalError> {
        self.price_call_at(self.params.spot())
    }

    /// Call price at an arbitrary real or complex spot, all other inputs fixed.
    ///
    /// The real part of `spot` is the actual spot; a non-zero imaginary part is
    /// a complex-step perturbation.
    ///
    /// # Errors
    /// - `InvalidParameters` if the real part of `spot` is not strictly
    ///   positive and finite
    /// - `KernelEvaluationFailure` if the result is not finite
    ///
    /// # Examples
    /// ```
    /// use num_complex::Complex64;
    /// use pricer_models::analytical::{BlackScholes, BlackScholesParams};
    ///
    /// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
    /// let bs = BlackScholes::new(params);
    ///
    /// let h = 1e-20;
    /// let value = bs.price_call_at(Complex64::new(100.0, h)).unwrap();
    /// let delta = value.im / h;
    /// assert!((delta - 0.539827837277029).abs() < 1e-12);
    /// ```
    pub fn price_call_at<S: Scalar>(&self, spot: S) -> Result<S, AnalyticalError> {
        let real_spot = spot.re();
        if !(real_spot.is_finite() && real_spot > 0.0) {
            return Err(AnalyticalError::invalid("spot", real_spot));
        }

        let price = call_price(&self.params, spot);
        if !price.is_finite() {
            return Err(AnalyticalError::KernelEvaluationFailure {
                spot: real_spot,
                detail: format!("non-finite call price {:?}", price),
            });
        }
        Ok(price)
    }
}

/// d₁ at a given spot; only meaningful when σ√T > 0.
#[inline]
fn d1_at<S: Scalar>(params: &BlackScholesParams, spot: S) -> S {
    let vol_sqrt_t = params.vol_sqrt_t();
    let forward = spot * params.carry_factor();
    ((forward / params.strike()).ln() + 0.5 * vol_sqrt_t * vol_sqrt_t) / vol_sqrt_t
}

/// Unchecked kernel body shared by every numeric representation.
fn call_price<S: Scalar>(params: &BlackScholesParams, spot: S) -> S {
    let strike = params.strike();
    let discount = params.rate_discount();
    let forward = spot * params.carry_factor();

    if params.is_degenerate() {
        return if forward.re() > strike {
            (forward - strike) * discount
        } else {
            S::zero()
        };
    }

    let d1 = d1_at(params, spot);
    let d2 = d1 - params.vol_sqrt_t();

    // C = e^(−rT)·(F·Φ(d₁) − K·Φ(d₂))
    (forward * d1.norm_cdf() - d2.norm_cdf() * strike) * discount
}
