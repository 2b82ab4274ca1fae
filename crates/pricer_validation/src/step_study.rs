//! Step-size study: estimator error as a function of the perturbation.
//!
//! For fixed parameters, every numerical estimator is evaluated over a
//! logarithmic grid of relative steps h/S. All estimators in one row are
//! given the same nominal step h, so their errors are directly comparable:
//!
//! - finite-difference errors fall with h until the cancellation floor, then
//!   rise again as rounding dominates
//! - complex-step Delta stays at machine precision across the whole grid
//! - the hybrid complex-step Gamma behaves like a finite difference
//!
//! An estimator whose step degenerates at some row (for example S + h
//! rounding back to S) records no value for that row instead of failing the
//! study. Finite differences perturb by the representable step (S + h) − S,
//! which can differ from h in the last bits, so each row also records the
//! step every estimator actually used.

use pricer_core::math::log_grid;
use pricer_greeks::{
    AnalyticGreeks, ComplexStepGreeks, DifferenceScheme, Estimate, FiniteDifferenceGreeks,
    GreekMethod, GreeksError,
};
use pricer_models::analytical::BlackScholesParams;
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::report::Greek;
use crate::scenario::Scenario;

/// Default lowest step exponent (h/S = 10^-16).
pub const DEFAULT_START_EXPONENT: f64 = -16.0;

/// Default highest step exponent (h/S = 10^-4).
pub const DEFAULT_END_EXPONENT: f64 = -4.0;

/// Default number of relative steps.
pub const DEFAULT_STEP_COUNT: usize = 24;

/// Estimators compared in a step study.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StudyEstimator {
    /// Central first difference.
    FdCentralDelta,
    /// Forward first difference.
    FdForwardDelta,
    /// Im V(S + ih) / h.
    CsDelta,
    /// Central second difference.
    FdCentralGamma,
    /// Forward second difference.
    FdForwardGamma,
    /// 2·(V(S) − Re V(S + ih)) / h², hybrid complex-step/real.
    CsHybridGamma,
    /// Im(V(S + hω) + V(S − hω)) / h², ω = e^(iπ/4).
    CsFortyFiveGamma,
}

impl StudyEstimator {
    /// All estimators, Delta first.
    pub const ALL: [StudyEstimator; 7] = [
        StudyEstimator::FdCentralDelta,
        StudyEstimator::FdForwardDelta,
        StudyEstimator::CsDelta,
        StudyEstimator::FdCentralGamma,
        StudyEstimator::FdForwardGamma,
        StudyEstimator::CsHybridGamma,
        StudyEstimator::CsFortyFiveGamma,
    ];

    /// Greek the estimator approximates.
    pub fn greek(&self) -> Greek {
        match self {
            Self::FdCentralDelta | Self::FdForwardDelta | Self::CsDelta => Greek::Delta,
            _ => Greek::Gamma,
        }
    }

    /// Column label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FdCentralDelta => "fd_central_delta",
            Self::FdForwardDelta => "fd_forward_delta",
            Self::CsDelta => "cs_delta",
            Self::FdCentralGamma => "fd_central_gamma",
            Self::FdForwardGamma => "fd_forward_gamma",
            Self::CsHybridGamma => "cs_hybrid_gamma",
            Self::CsFortyFiveGamma => "cs_45_gamma",
        }
    }

    /// Estimators of one Greek.
    pub fn for_greek(greek: Greek) -> impl Iterator<Item = StudyEstimator> {
        Self::ALL.into_iter().filter(move |e| e.greek() == greek)
    }
}

/// One relative step of a study.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepStudyRow {
    /// h / S
    pub relative_step: f64,
    /// Nominal absolute step h = (h/S)·S passed to every estimator.
    pub nominal_step: f64,
    /// Closed-form Delta.
    pub analytic_delta: f64,
    /// Closed-form Gamma.
    pub analytic_gamma: f64,
    /// Estimates in [`StudyEstimator::ALL`] order; `None` where the step
    /// was degenerate.
    pub estimates: [Option<f64>; 7],
    /// Realised steps in [`StudyEstimator::ALL`] order.
    pub realised_steps: [Option<f64>; 7],
}

impl StepStudyRow {
    /// Estimate of one estimator.
    pub fn value(&self, estimator: StudyEstimator) -> Option<f64> {
        self.estimates[estimator as usize]
    }

    /// Step one estimator actually perturbed by.
    pub fn realised_step(&self, estimator: StudyEstimator) -> Option<f64> {
        self.realised_steps[estimator as usize]
    }

    /// Absolute error of one estimator against the closed form.
    pub fn error(&self, estimator: StudyEstimator) -> Option<f64> {
        let reference = match estimator.greek() {
            Greek::Delta => self.analytic_delta,
            Greek::Gamma => self.analytic_gamma,
        };
        self.value(estimator).map(|value| (value - reference).abs())
    }
}

/// Completed study.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepStudy {
    /// Parameters studied.
    pub params: BlackScholesParams,
    /// One row per relative step, ascending.
    pub rows: Vec<StepStudyRow>,
}

impl StepStudy {
    /// Relative step that minimises the error of `estimator`.
    pub fn best_step(&self, estimator: StudyEstimator) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.error(estimator)
                    .filter(|e| e.is_finite())
                    .map(|e| (row.relative_step, e))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(step, _)| step)
    }

    /// Relative step with the smallest central finite-difference Delta error.
    ///
    /// Below this step rounding error dominates and accuracy degrades.
    pub fn cancellation_floor(&self) -> Option<f64> {
        self.best_step(StudyEstimator::FdCentralDelta)
    }
}

/// Step-size study runner.
///
/// # Examples
/// ```
/// use pricer_validation::{ScenarioId, StepSizeStudy};
///
/// let scenario = ScenarioId::AtmReference.scenario().unwrap();
/// let study = StepSizeStudy::for_scenario(&scenario).unwrap().run().unwrap();
///
/// let floor = study.cancellation_floor().unwrap();
/// assert!(floor > 1e-8 && floor < 1e-4);
/// ```
#[derive(Clone, Debug)]
pub struct StepSizeStudy {
    params: BlackScholesParams,
    relative_steps: Vec<f64>,
}

impl StepSizeStudy {
    /// Creates a study over explicit relative steps.
    ///
    /// # Errors
    /// `InvalidScenario` if any step is not positive and finite.
    pub fn new(
        params: BlackScholesParams,
        relative_steps: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if let Some(bad) = relative_steps
            .iter()
            .find(|s| !(s.is_finite() && **s > 0.0))
        {
            return Err(ValidationError::InvalidScenario {
                reason: format!("relative step must be positive, got {}", bad),
            });
        }
        Ok(Self {
            params,
            relative_steps,
        })
    }

    /// Creates a study over `points` relative steps 10^start … 10^end.
    ///
    /// # Errors
    /// `InvalidScenario` if the exponents or point count do not form a grid.
    pub fn with_grid(
        params: BlackScholesParams,
        start_exponent: f64,
        end_exponent: f64,
        points: usize,
    ) -> Result<Self, ValidationError> {
        Self::new(params, log_grid(start_exponent, end_exponent, points)?)
    }

    /// Creates a study over 10^-16 … 10^-4 with 24 steps.
    pub fn with_default_grid(params: BlackScholesParams) -> Result<Self, ValidationError> {
        Self::with_grid(
            params,
            DEFAULT_START_EXPONENT,
            DEFAULT_END_EXPONENT,
            DEFAULT_STEP_COUNT,
        )
    }

    /// Default-grid study at a scenario's base parameters.
    pub fn for_scenario(scenario: &Scenario) -> Result<Self, ValidationError> {
        Self::with_default_grid(*scenario.base())
    }

    /// Relative steps of the study.
    pub fn relative_steps(&self) -> &[f64] {
        &self.relative_steps
    }

    /// Evaluates every estimator at every step.
    ///
    /// # Errors
    /// `GridPointFailed` if the pricing kernel itself fails; degenerate steps
    /// are recorded as missing values instead.
    pub fn run(&self) -> Result<StepStudy, ValidationError> {
        let spot = self.params.spot();
        info!(spot, steps = self.relative_steps.len(), "starting step-size study");

        let analytic = AnalyticGreeks::new();
        let analytic_delta = analytic.delta(&self.params);
        let analytic_gamma = analytic.gamma(&self.params);

        // Relative steps on the calculators are unused: every call passes h
        let central = FiniteDifferenceGreeks::new(1.0, 1.0, DifferenceScheme::Central);
        let forward = FiniteDifferenceGreeks::new(1.0, 1.0, DifferenceScheme::Forward);
        let complex = ComplexStepGreeks::new(1.0, 1.0);

        let p = &self.params;
        let mut rows = Vec::with_capacity(self.relative_steps.len());
        for &relative_step in &self.relative_steps {
            let h = relative_step * spot;
            let results = [
                keep(central.delta_with_step(p, h), GreekMethod::FiniteDifference)?,
                keep(forward.delta_with_step(p, h), GreekMethod::FiniteDifference)?,
                keep(complex.delta_with_step(p, h), GreekMethod::ComplexStep)?,
                keep(central.gamma_with_step(p, h), GreekMethod::FiniteDifference)?,
                keep(forward.gamma_with_step(p, h), GreekMethod::FiniteDifference)?,
                keep(complex.gamma_with_step(p, h), GreekMethod::ComplexStep)?,
                keep(complex.gamma_forty_five(p, h), GreekMethod::ComplexStep)?,
            ];
            debug!(relative_step, step = h, "step-size row evaluated");

            rows.push(StepStudyRow {
                relative_step,
                nominal_step: h,
                analytic_delta,
                analytic_gamma,
                estimates: results.map(|r| r.map(|e| e.value)),
                realised_steps: results.map(|r| r.map(|e| e.step)),
            });
        }

        let study = StepStudy {
            params: self.params,
            rows,
        };
        info!(
            spot,
            cancellation_floor = study.cancellation_floor(),
            "step-size study completed"
        );
        Ok(study)
    }
}

/// Maps a degenerate step to a missing value and a kernel failure to an error.
fn keep(
    result: Result<Estimate, GreeksError>,
    method: GreekMethod,
) -> Result<Option<Estimate>, ValidationError> {
    match result {
        Ok(estimate) => Ok(Some(estimate)),
        Err(GreeksError::InvalidStepSize { .. }) => Ok(None),
        Err(source) => Err(ValidationError::GridPointFailed {
            spot: source.spot().unwrap_or(f64::NAN),
            method,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm() -> BlackScholesParams {
        BlackScholesParams::new(100.0, 100.0, 0.0, 0.0, 0.2, 1.0).unwrap()
    }

    fn study() -> StepStudy {
        StepSizeStudy::with_default_grid(atm()).unwrap().run().unwrap()
    }

    #[test]
    fn test_default_grid_shape() {
        let study = study();
        assert_eq!(study.rows.len(), DEFAULT_STEP_COUNT);
        assert!((study.rows[0].relative_step - 1e-16).abs() < 1e-30);
        assert!(study.rows.windows(2).all(|w| w[0].nominal_step < w[1].nominal_step));
    }

    #[test]
    fn test_complex_step_delta_flat_across_grid() {
        // Truncation is O(h²); below h/S = 1e-7 it is under rounding
        for row in study().rows.iter().filter(|r| r.relative_step < 1e-7) {
            let error = row.error(StudyEstimator::CsDelta).unwrap();
            assert!(error < 1e-12, "h/S = {}: error {}", row.relative_step, error);
        }
    }

    #[test]
    fn test_finite_difference_error_rises_below_floor() {
        let study = study();
        let floor = study.cancellation_floor().unwrap();
        let floor_row = study.rows.iter().find(|r| r.relative_step == floor).unwrap();
        let smallest = &study.rows[0];

        let floor_error = floor_row.error(StudyEstimator::FdCentralDelta).unwrap();
        if let Some(error) = smallest.error(StudyEstimator::FdCentralDelta) {
            assert!(error > floor_error);
        }
        assert!(floor > 1e-8 && floor < 1e-4);
    }

    #[test]
    fn test_degenerate_rows_record_missing_values() {
        // h/S = 1e-18 is below half an ulp of 1.0: S + h rounds to S
        let study = StepSizeStudy::new(atm(), vec![1e-18, 1e-6]).unwrap().run().unwrap();
        assert_eq!(study.rows[0].value(StudyEstimator::FdCentralDelta), None);
        assert_eq!(study.rows[0].realised_step(StudyEstimator::FdCentralDelta), None);
        assert!(study.rows[0].value(StudyEstimator::CsDelta).is_some());
        assert!(study.rows[1].value(StudyEstimator::FdCentralDelta).is_some());
    }

    #[test]
    fn test_rows_record_realised_steps() {
        // 1e-10 · 100 is not representable as a difference above 100
        let study = StepSizeStudy::new(atm(), vec![1e-10]).unwrap().run().unwrap();
        let row = &study.rows[0];
        let spot = 100.0;
        let realised = (spot + row.nominal_step) - spot;
        assert_ne!(realised, row.nominal_step);

        for estimator in [
            StudyEstimator::FdCentralDelta,
            StudyEstimator::FdForwardDelta,
            StudyEstimator::FdCentralGamma,
            StudyEstimator::FdForwardGamma,
        ] {
            assert_eq!(row.realised_step(estimator), Some(realised), "{:?}", estimator);
        }
        // Imaginary perturbations need no rounding
        assert_eq!(row.realised_step(StudyEstimator::CsDelta), Some(row.nominal_step));
        assert_eq!(row.realised_step(StudyEstimator::CsHybridGamma), Some(row.nominal_step));
    }

    #[test]
    fn test_rejects_non_positive_steps() {
        assert!(StepSizeStudy::new(atm(), vec![1e-6, 0.0]).is_err());
    }

    #[test]
    fn test_custom_grid() {
        let study = StepSizeStudy::with_grid(atm(), -8.0, -4.0, 5).unwrap();
        assert_eq!(study.relative_steps().len(), 5);
        assert!((study.relative_steps()[2] - 1e-6).abs() < 1e-20);
        assert!(StepSizeStudy::with_grid(atm(), -4.0, -8.0, 5).is_err());
    }

    #[test]
    fn test_estimator_greeks() {
        assert_eq!(StudyEstimator::for_greek(Greek::Delta).count(), 3);
        assert_eq!(StudyEstimator::for_greek(Greek::Gamma).count(), 4);
        assert_eq!(StudyEstimator::CsHybridGamma.greek(), Greek::Gamma);
    }
}
