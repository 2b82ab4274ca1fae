//! Validated market inputs for the Black-Scholes kernel.

use super::error::AnalyticalError;

/// Immutable Black-Scholes parameter set (S, K, r, q, σ, T).
///
/// Construction validates every input, so a `BlackScholesParams` value always
/// produces a well-defined kernel evaluation. σ = 0 and T = 0 are accepted as
/// degenerate boundary cases and handled explicitly by the kernel.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholesParams;
///
/// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
/// assert!(!params.is_degenerate());
///
/// // Non-positive spot is rejected
/// assert!(BlackScholesParams::new(0.0, 100.0, 0.0, 0.0, 0.2, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlackScholesParams {
    /// Spot price (S)
    spot: f64,
    /// Strike price (K)
    strike: f64,
    /// Continuously compounded risk-free rate (r)
    rate: f64,
    /// Continuous dividend yield (q)
    dividend: f64,
    /// Volatility (σ)
    volatility: f64,
    /// Time to maturity in years (T)
    expiry: f64,
}

impl BlackScholesParams {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    /// `AnalyticalError::InvalidParameters` naming the first offending input:
    /// - spot or strike not strictly positive
    /// - volatility or expiry negative
    /// - any input non-finite
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        dividend: f64,
        volatility: f64,
        expiry: f64,
    ) -> Result<Self, AnalyticalError> {
        require_positive("spot", spot)?;
        require_positive("strike", strike)?;
        require_finite("rate", rate)?;
        require_finite("dividend", dividend)?;
        require_non_negative("volatility", volatility)?;
        require_non_negative("expiry", expiry)?;

        Ok(Self {
            spot,
            strike,
            rate,
            dividend,
            volatility,
            expiry,
        })
    }

    /// Returns a copy with the spot replaced, re-validating the new spot.
    pub fn with_spot(&self, spot: f64) -> Result<Self, AnalyticalError> {
        require_positive("spot", spot)?;
        Ok(Self { spot, ..*self })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend(&self) -> f64 {
        self.dividend
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the time to maturity in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Total standard deviation of log-returns, σ√T.
    #[inline]
    pub fn vol_sqrt_t(&self) -> f64 {
        self.volatility * self.expiry.sqrt()
    }

    /// True when σ√T = 0 (σ = 0 or T = 0): the price is a deterministic payoff
    /// and d₁/d₂ are undefined.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vol_sqrt_t() == 0.0
    }

    /// Risk-free discount factor e^(−rT).
    #[inline]
    pub fn rate_discount(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    /// Dividend discount factor e^(−qT).
    #[inline]
    pub fn dividend_discount(&self) -> f64 {
        (-self.dividend * self.expiry).exp()
    }

    /// Forward growth factor e^((r−q)T), so that F = S·e^((r−q)T).
    #[inline]
    pub fn carry_factor(&self) -> f64 {
        ((self.rate - self.dividend) * self.expiry).exp()
    }
}

fn require_finite(parameter: &'static str, value: f64) -> Result<(), AnalyticalError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalyticalError::invalid(parameter, value))
    }
}

fn require_positive(parameter: &'static str, value: f64) -> Result<(), AnalyticalError> {
    require_finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(AnalyticalError::invalid(parameter, value))
    }
}

fn require_non_negative(parameter: &'static str, value: f64) -> Result<(), AnalyticalError> {
    require_finite(parameter, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(AnalyticalError::invalid(parameter, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atm() -> BlackScholesParams {
        BlackScholesParams::new(100.0, 100.0, 0.05, 0.02, 0.2, 1.0).unwrap()
    }

    #[test]
    fn test_new_valid_parameters() {
        let params = atm();
        assert_eq!(params.spot(), 100.0);
        assert_eq!(params.strike(), 100.0);
        assert_eq!(params.rate(), 0.05);
        assert_eq!(params.dividend(), 0.02);
        assert_eq!(params.volatility(), 0.2);
        assert_eq!(params.expiry(), 1.0);
    }

    #[test]
    fn test_negative_rate_and_dividend_allowed() {
        assert!(BlackScholesParams::new(100.0, 100.0, -0.01, -0.02, 0.2, 1.0).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_spot() {
        for spot in [0.0, -100.0] {
            match BlackScholesParams::new(spot, 100.0, 0.0, 0.0, 0.2, 1.0) {
                Err(AnalyticalError::InvalidParameters { parameter, value }) => {
                    assert_eq!(parameter, "spot");
                    assert_eq!(value, spot);
                }
                other => panic!("Expected InvalidParameters, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_strike() {
        let result = BlackScholesParams::new(100.0, 0.0, 0.0, 0.0, 0.2, 1.0);
        assert_eq!(result, Err(AnalyticalError::invalid("strike", 0.0)));
    }

    #[test]
    fn test_rejects_negative_expiry() {
        let result = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, -0.5);
        assert_eq!(result, Err(AnalyticalError::invalid("expiry", -0.5)));
    }

    #[test]
    fn test_rejects_negative_volatility() {
        let result = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, -0.2, 1.0);
        assert_eq!(result, Err(AnalyticalError::invalid("volatility", -0.2)));
    }

    #[test]
    fn test_rejects_non_finite_inputs() {
        assert!(BlackScholesParams::new(f64::NAN, 100.0, 0.0, 0.0, 0.2, 1.0).is_err());
        assert!(BlackScholesParams::new(100.0, 100.0, f64::INFINITY, 0.0, 0.2, 1.0).is_err());
        assert!(BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_volatility_and_expiry_are_degenerate() {
        let zero_vol = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.0, 1.0).unwrap();
        let zero_expiry = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 0.0).unwrap();
        assert!(zero_vol.is_degenerate());
        assert!(zero_expiry.is_degenerate());
        assert!(!atm().is_degenerate());
    }

    #[test]
    fn test_with_spot_replaces_only_spot() {
        let bumped = atm().with_spot(105.0).unwrap();
        assert_eq!(bumped.spot(), 105.0);
        assert_eq!(bumped.strike(), 100.0);
        assert_eq!(bumped.volatility(), 0.2);
        assert!(atm().with_spot(-1.0).is_err());
    }

    #[test]
    fn test_discount_factors() {
        let params = atm();
        assert_relative_eq!(params.rate_discount(), (-0.05_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(params.dividend_discount(), (-0.02_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(params.carry_factor(), (0.03_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(params.vol_sqrt_t(), 0.2, epsilon = 1e-15);
    }
}
