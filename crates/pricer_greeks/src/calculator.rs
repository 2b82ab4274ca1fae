//! Common interface of the three Greeks calculators.

use pricer_models::analytical::BlackScholesParams;

use crate::error::GreeksError;
use crate::method::GreekMethod;
use crate::sample::GreekSample;

/// A strategy that produces Delta and Gamma for one parameter set.
///
/// Implementations are stateless apart from their step configuration, so a
/// sample is a pure function of (parameters, method).
pub trait GreeksCalculator: Send + Sync {
    /// Method tag written into every sample.
    fn method(&self) -> GreekMethod;

    /// Computes Delta and Gamma at `params.spot()`.
    ///
    /// # Errors
    /// - [`GreeksError::InvalidStepSize`] if a perturbation is degenerate
    /// - [`GreeksError::Kernel`] if the pricing kernel fails
    fn sample(&self, params: &BlackScholesParams) -> Result<GreekSample, GreeksError>;
}
