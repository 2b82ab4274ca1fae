//! Closed-form Black-Scholes Delta and Gamma.
//!
//! - Delta = e^(−qT)·Φ(d₁)
//! - Gamma = e^(−qT)·φ(d₁) / (S·σ·√T)
//!
//! ## Degenerate boundary (σ√T = 0)
//!
//! The price is the deterministic payoff e^(−rT)·max(F − K, 0), so:
//! - Delta = e^(−qT)·1[F > K], which at T = 0 is the indicator 1[S > K]
//! - Gamma = 0 by convention (curvature vanishes in the deterministic limit)
//!
//! Delta is discontinuous at F = K. Exactly at the kink this module returns 0
//! (the strict inequality), which is a convention rather than a derivative.

use pricer_core::math::{norm_cdf, norm_pdf};
use pricer_models::analytical::{BlackScholes, BlackScholesParams};

use crate::calculator::GreeksCalculator;
use crate::error::GreeksError;
use crate::method::GreekMethod;
use crate::sample::GreekSample;

/// Closed-form Greeks calculator (ground truth for validation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalyticGreeks;

impl AnalyticGreeks {
    /// Creates the calculator.
    pub fn new() -> Self {
        Self
    }

    /// Closed-form Delta.
    ///
    /// # Examples
    /// ```
    /// use pricer_greeks::AnalyticGreeks;
    /// use pricer_models::analytical::BlackScholesParams;
    ///
    /// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
    /// let delta = AnalyticGreeks::new().delta(&params);
    /// assert!((delta - 0.539827837277029).abs() < 1e-14);
    /// ```
    pub fn delta(&self, params: &BlackScholesParams) -> f64 {
        match BlackScholes::new(*params).d1() {
            Some(d1) => params.dividend_discount() * norm_cdf(d1),
            None => {
                let forward = params.spot() * params.carry_factor();
                if forward > params.strike() {
                    params.dividend_discount()
                } else {
                    0.0
                }
            }
        }
    }

    /// Closed-form Gamma (0 when σ√T = 0).
    pub fn gamma(&self, params: &BlackScholesParams) -> f64 {
        match BlackScholes::new(*params).d1() {
            Some(d1) => {
                params.dividend_discount() * norm_pdf(d1) / (params.spot() * params.vol_sqrt_t())
            }
            None => 0.0,
        }
    }
}

impl GreeksCalculator for AnalyticGreeks {
    fn method(&self) -> GreekMethod {
        GreekMethod::Analytic
    }

    fn sample(&self, params: &BlackScholesParams) -> Result<GreekSample, GreeksError> {
        Ok(GreekSample::analytic(
            params.spot(),
            self.delta(params),
            self.gamma(params),
        ))
    }
}
