//! Method and estimator tags attached to every Greek sample.

use std::fmt;

/// Differentiation method that produced a [`GreekSample`](crate::GreekSample).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GreekMethod {
    /// Closed-form Black-Scholes Greeks (ground truth).
    Analytic,
    /// Bump-and-revalue on real spot perturbations.
    FiniteDifference,
    /// Imaginary spot perturbation. Gamma uses the hybrid estimator.
    ComplexStep,
}

impl GreekMethod {
    /// All methods in reporting order.
    pub const ALL: [GreekMethod; 3] = [
        GreekMethod::Analytic,
        GreekMethod::FiniteDifference,
        GreekMethod::ComplexStep,
    ];

    /// Returns the method name used in logs and artifacts.
    pub fn name(&self) -> &'static str {
        match self {
            GreekMethod::Analytic => "Analytic",
            GreekMethod::FiniteDifference => "FiniteDifference",
            GreekMethod::ComplexStep => "ComplexStep",
        }
    }

    /// Returns `true` for the numerical methods compared against [`GreekMethod::Analytic`].
    pub fn is_numerical(&self) -> bool {
        !matches!(self, GreekMethod::Analytic)
    }
}

impl fmt::Display for GreekMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formula that produced a Gamma value.
///
/// Complex-step Gamma is never a pure complex-step derivative: the hybrid
/// estimator subtracts a real evaluation and therefore inherits the
/// cancellation sensitivity of finite differences. Every reported Gamma
/// carries this tag so the distinction is never lost downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GammaEstimator {
    /// e^(−qT)·φ(d₁) / (S·σ·√T), or 0 when σ√T = 0.
    ClosedForm,
    /// (V(S+h) − 2V(S) + V(S−h)) / h²
    CentralSecondDifference,
    /// (V(S+2h) − 2V(S+h) + V(S)) / h²
    ForwardSecondDifference,
    /// 2·(V(S) − Re V(S+ih)) / h², a hybrid complex-step/real estimator.
    HybridComplexStep,
    /// Im(V(S+hω) + V(S−hω)) / h² with ω = e^(iπ/4).
    FortyFiveDegreeComplexStep,
}

impl GammaEstimator {
    /// Returns the estimator label used in artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            GammaEstimator::ClosedForm => "ClosedForm",
            GammaEstimator::CentralSecondDifference => "CentralSecondDifference",
            GammaEstimator::ForwardSecondDifference => "ForwardSecondDifference",
            GammaEstimator::HybridComplexStep => "HybridComplexStep",
            GammaEstimator::FortyFiveDegreeComplexStep => "FortyFiveDegreeComplexStep",
        }
    }

    /// Returns `true` if the estimator subtracts nearly equal real values.
    pub fn is_cancellation_prone(&self) -> bool {
        !matches!(
            self,
            GammaEstimator::ClosedForm | GammaEstimator::FortyFiveDegreeComplexStep
        )
    }
}

impl fmt::Display for GammaEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        let names: Vec<_> = GreekMethod::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["Analytic", "FiniteDifference", "ComplexStep"]);
    }

    #[test]
    fn test_only_analytic_is_reference() {
        assert!(!GreekMethod::Analytic.is_numerical());
        assert!(GreekMethod::FiniteDifference.is_numerical());
        assert!(GreekMethod::ComplexStep.is_numerical());
    }

    #[test]
    fn test_hybrid_gamma_is_flagged_as_cancellation_prone() {
        assert!(GammaEstimator::HybridComplexStep.is_cancellation_prone());
        assert!(GammaEstimator::CentralSecondDifference.is_cancellation_prone());
        assert!(!GammaEstimator::ClosedForm.is_cancellation_prone());
        assert_eq!(GammaEstimator::HybridComplexStep.to_string(), "HybridComplexStep");
    }
}
