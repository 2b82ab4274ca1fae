//! Greeks calculation configuration.
//!
//! Provides [`GreeksConfig`] for configuring step sizes of the numerical
//! calculators, and [`DifferenceScheme`] for selecting the finite-difference
//! stencil.
//!
//! All step sizes are relative: the absolute step is `relative * spot`, so
//! the same configuration behaves consistently across a spot sweep.

use thiserror::Error;

/// Finite-difference stencil.
///
/// # Variants
///
/// * `Central` - symmetric bumps, O(h²) truncation error
/// * `Forward` - one-sided bumps, O(h) truncation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DifferenceScheme {
    /// Delta ≈ (V(S+h) − V(S−h)) / 2h, Gamma ≈ (V(S+h) − 2V(S) + V(S−h)) / h².
    #[default]
    Central,
    /// Delta ≈ (V(S+h) − V(S)) / h, Gamma ≈ (V(S+2h) − 2V(S+h) + V(S)) / h².
    Forward,
}

/// ε^(1/3): balances O(h²) truncation against O(ε/h) cancellation for a
/// central first derivative.
pub fn default_delta_step() -> f64 {
    f64::EPSILON.cbrt()
}

/// ε^(1/4): balances O(h²) truncation against O(ε/h²) cancellation for a
/// second derivative.
pub fn default_gamma_step() -> f64 {
    f64::EPSILON.powf(0.25)
}

/// Default relative step for complex-step Delta.
pub const DEFAULT_COMPLEX_DELTA_STEP: f64 = 1e-20;

/// Configuration for Greeks calculation.
///
/// Use the builder pattern via [`GreeksConfig::builder()`] for construction.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `fd_delta_step_relative` | ε^(1/3) ≈ 6.06e-6 | FD Delta step / spot |
/// | `fd_gamma_step_relative` | ε^(1/4) ≈ 1.22e-4 | FD Gamma step / spot |
/// | `scheme` | `Central` | FD stencil |
/// | `cs_delta_step_relative` | 1e-20 | Complex-step Delta step / spot |
/// | `cs_gamma_step_relative` | ε^(1/4) ≈ 1.22e-4 | Hybrid Gamma step / spot |
///
/// The hybrid complex-step Gamma subtracts V(S) from Re V(S+ih), so it needs
/// a finite-difference sized step rather than the tiny Delta step.
///
/// # Examples
///
/// ```rust
/// use pricer_greeks::{DifferenceScheme, GreeksConfig};
///
/// // Use defaults
/// let config = GreeksConfig::default();
/// assert_eq!(config.scheme, DifferenceScheme::Central);
///
/// // Use builder for custom values
/// let config = GreeksConfig::builder()
///     .fd_delta_step_relative(1e-5)
///     .scheme(DifferenceScheme::Forward)
///     .build()
///     .unwrap();
/// assert!((config.fd_delta_step(200.0) - 2e-3).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreeksConfig {
    /// Relative step for finite-difference Delta.
    pub fd_delta_step_relative: f64,

    /// Relative step for finite-difference Gamma.
    pub fd_gamma_step_relative: f64,

    /// Finite-difference stencil.
    pub scheme: DifferenceScheme,

    /// Relative step for complex-step Delta.
    pub cs_delta_step_relative: f64,

    /// Relative step for the hybrid complex-step Gamma.
    pub cs_gamma_step_relative: f64,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            fd_delta_step_relative: default_delta_step(),
            fd_gamma_step_relative: default_gamma_step(),
            scheme: DifferenceScheme::default(),
            cs_delta_step_relative: DEFAULT_COMPLEX_DELTA_STEP,
            cs_gamma_step_relative: default_gamma_step(),
        }
    }
}

impl GreeksConfig {
    /// Creates a new builder for constructing a `GreeksConfig`.
    pub fn builder() -> GreeksConfigBuilder {
        GreeksConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Every relative step must lie in (0, 1].
    pub fn validate(&self) -> Result<(), GreeksConfigError> {
        check_relative_step("fd_delta_step_relative", self.fd_delta_step_relative)?;
        check_relative_step("fd_gamma_step_relative", self.fd_gamma_step_relative)?;
        check_relative_step("cs_delta_step_relative", self.cs_delta_step_relative)?;
        check_relative_step("cs_gamma_step_relative", self.cs_gamma_step_relative)?;
        Ok(())
    }

    /// Absolute finite-difference Delta step at `spot` (before rounding).
    #[inline]
    pub fn fd_delta_step(&self, spot: f64) -> f64 {
        self.fd_delta_step_relative * spot
    }

    /// Absolute finite-difference Gamma step at `spot` (before rounding).
    #[inline]
    pub fn fd_gamma_step(&self, spot: f64) -> f64 {
        self.fd_gamma_step_relative * spot
    }

    /// Absolute complex-step Delta step at `spot`.
    #[inline]
    pub fn cs_delta_step(&self, spot: f64) -> f64 {
        self.cs_delta_step_relative * spot
    }

    /// Absolute hybrid complex-step Gamma step at `spot`.
    #[inline]
    pub fn cs_gamma_step(&self, spot: f64) -> f64 {
        self.cs_gamma_step_relative * spot
    }
}

fn check_relative_step(parameter: &'static str, value: f64) -> Result<(), GreeksConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(GreeksConfigError::InvalidStep { parameter, value })
    }
}

/// Builder for [`GreeksConfig`].
#[derive(Debug, Default)]
pub struct GreeksConfigBuilder {
    fd_delta_step_relative: Option<f64>,
    fd_gamma_step_relative: Option<f64>,
    scheme: Option<DifferenceScheme>,
    cs_delta_step_relative: Option<f64>,
    cs_gamma_step_relative: Option<f64>,
}

impl GreeksConfigBuilder {
    /// Sets the relative finite-difference Delta step (default: ε^(1/3)).
    pub fn fd_delta_step_relative(mut self, step: f64) -> Self {
        self.fd_delta_step_relative = Some(step);
        self
    }

    /// Sets the relative finite-difference Gamma step (default: ε^(1/4)).
    pub fn fd_gamma_step_relative(mut self, step: f64) -> Self {
        self.fd_gamma_step_relative = Some(step);
        self
    }

    /// Sets the finite-difference stencil (default: central).
    pub fn scheme(mut self, scheme: DifferenceScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Sets the relative complex-step Delta step (default: 1e-20).
    pub fn cs_delta_step_relative(mut self, step: f64) -> Self {
        self.cs_delta_step_relative = Some(step);
        self
    }

    /// Sets the relative hybrid complex-step Gamma step (default: ε^(1/4)).
    pub fn cs_gamma_step_relative(mut self, step: f64) -> Self {
        self.cs_gamma_step_relative = Some(step);
        self
    }

    /// Builds the configuration, validating all parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GreeksConfigError`] if any step is outside (0, 1].
    pub fn build(self) -> Result<GreeksConfig, GreeksConfigError> {
        let defaults = GreeksConfig::default();
        let config = GreeksConfig {
            fd_delta_step_relative: self
                .fd_delta_step_relative
                .unwrap_or(defaults.fd_delta_step_relative),
            fd_gamma_step_relative: self
                .fd_gamma_step_relative
                .unwrap_or(defaults.fd_gamma_step_relative),
            scheme: self.scheme.unwrap_or(defaults.scheme),
            cs_delta_step_relative: self
                .cs_delta_step_relative
                .unwrap_or(defaults.cs_delta_step_relative),
            cs_gamma_step_relative: self
                .cs_gamma_step_relative
                .unwrap_or(defaults.cs_gamma_step_relative),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Error type for [`GreeksConfig`] validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GreeksConfigError {
    /// A relative step is not in (0, 1].
    #[error("Invalid step: {parameter} = {value} (must be in (0, 1])")]
    InvalidStep {
        /// Name of the configuration field
        parameter: &'static str,
        /// The rejected value
        value: f64,
    },
}
