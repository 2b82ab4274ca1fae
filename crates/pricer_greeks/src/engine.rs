//! Dispatch over the three calculators with a shared configuration.

use pricer_models::analytical::BlackScholesParams;
use tracing::debug;

use crate::analytic::AnalyticGreeks;
use crate::calculator::GreeksCalculator;
use crate::complex_step::ComplexStepGreeks;
use crate::config::{GreeksConfig, GreeksConfigError};
use crate::error::GreeksError;
use crate::finite_difference::FiniteDifferenceGreeks;
use crate::method::GreekMethod;
use crate::sample::GreekSample;

/// Greeks engine holding one calculator per method.
///
/// Method selection is static dispatch over [`GreekMethod`]; the engine has
/// no mutable state and can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use pricer_greeks::{GreekMethod, GreeksEngine};
/// use pricer_models::analytical::BlackScholesParams;
///
/// let engine = GreeksEngine::with_defaults();
/// let params = BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap();
///
/// let [analytic, fd, cs] = engine.sample_all(&params).unwrap();
/// assert_eq!(fd.method, GreekMethod::FiniteDifference);
/// assert!((cs.delta - analytic.delta).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GreeksEngine {
    config: GreeksConfig,
    analytic: AnalyticGreeks,
    finite_difference: FiniteDifferenceGreeks,
    complex_step: ComplexStepGreeks,
}

impl GreeksEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: GreeksConfig) -> Result<Self, GreeksConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    /// Creates an engine with default step sizes.
    pub fn with_defaults() -> Self {
        Self::assemble(GreeksConfig::default())
    }

    fn assemble(config: GreeksConfig) -> Self {
        Self {
            analytic: AnalyticGreeks::new(),
            finite_difference: FiniteDifferenceGreeks::from_config(&config),
            complex_step: ComplexStepGreeks::from_config(&config),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GreeksConfig {
        &self.config
    }

    /// Returns the calculator for `method`.
    pub fn calculator(&self, method: GreekMethod) -> &dyn GreeksCalculator {
        match method {
            GreekMethod::Analytic => &self.analytic,
            GreekMethod::FiniteDifference => &self.finite_difference,
            GreekMethod::ComplexStep => &self.complex_step,
        }
    }

    /// Computes one sample with the given method.
    pub fn sample(
        &self,
        method: GreekMethod,
        params: &BlackScholesParams,
    ) -> Result<GreekSample, GreeksError> {
        let result = match method {
            GreekMethod::Analytic => self.analytic.sample(params),
            GreekMethod::FiniteDifference => self.finite_difference.sample(params),
            GreekMethod::ComplexStep => self.complex_step.sample(params),
        };

        if let Ok(sample) = &result {
            debug!(
                spot = sample.spot,
                method = %method,
                delta = sample.delta,
                gamma = sample.gamma,
                "greek sample"
            );
        }
        result
    }

    /// Computes one sample per method, in [`GreekMethod::ALL`] order.
    ///
    /// # Errors
    /// The first failing method's error; no partial result is returned.
    pub fn sample_all(&self, params: &BlackScholesParams) -> Result<[GreekSample; 3], GreeksError> {
        Ok([
            self.sample(GreekMethod::Analytic, params)?,
            self.sample(GreekMethod::FiniteDifference, params)?,
            self.sample(GreekMethod::ComplexStep, params)?,
        ])
    }
}

impl Default for GreeksEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
