//! Scenario validator state machine.
//!
//! ```text
//! Configured ──run()──▶ Running ──▶ Completed
//!                          │
//!                          └──────▶ Failed
//! ```
//!
//! A run evaluates all three calculators at every grid spot, assembles the
//! per-method series in ascending spot order and derives the
//! [`ValidationReport`]. Any calculator failure fails the whole run with the
//! offending spot and method; partial series are dropped.
//!
//! A finished validator can be run again. Every run is a pure function of the
//! scenario and configuration, so repeated runs produce identical series.

use pricer_greeks::{GreekMethod, GreekSample, GreeksConfig, GreeksEngine, GreeksError};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::report::{GreekSeries, Tolerances, ValidationOutcome, ValidationReport};
use crate::scenario::Scenario;

/// Configuration for a validation run.
///
/// # Examples
///
/// ```rust
/// use pricer_validation::{ValidationConfig, Tolerances};
///
/// let config = ValidationConfig {
///     tolerances: Tolerances::new(1e-8, 1e-5).unwrap(),
///     parallel: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationConfig {
    /// Step sizes of the numerical calculators.
    pub greeks: GreeksConfig,
    /// Pass/fail bounds.
    pub tolerances: Tolerances,
    /// Evaluate grid points on the rayon thread pool.
    pub parallel: bool,
}

impl ValidationConfig {
    /// Validates step sizes and tolerances.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.greeks.validate()?;
        self.tolerances.validate()
    }
}

/// Lifecycle of a [`ScenarioValidator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidatorState {
    /// Constructed, never run.
    Configured,
    /// Sweep in progress.
    Running,
    /// Last run produced a report.
    Completed,
    /// Last run hit a calculator failure.
    Failed,
}

/// Output of a completed run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationRun {
    /// Per-method samples ordered by spot.
    pub series: GreekSeries,
    /// Comparison against Analytic.
    pub report: ValidationReport,
}

impl ValidationRun {
    /// Validation-level outcome of the report.
    pub fn outcome(&self) -> ValidationOutcome {
        self.report.outcome()
    }
}

/// Runs all three calculators across a scenario's spot sweep.
///
/// # Examples
///
/// ```rust
/// use pricer_validation::{ScenarioId, ScenarioValidator, ValidationConfig, ValidatorState};
///
/// let scenario = ScenarioId::AtmReference.scenario().unwrap();
/// let mut validator = ScenarioValidator::new(scenario, ValidationConfig::default()).unwrap();
/// assert_eq!(validator.state(), ValidatorState::Configured);
///
/// let run = validator.run().unwrap();
/// assert_eq!(validator.state(), ValidatorState::Completed);
/// assert_eq!(run.series.len(), 101);
/// assert!(run.report.passed);
/// ```
#[derive(Debug)]
pub struct ScenarioValidator {
    scenario: Scenario,
    engine: GreeksEngine,
    tolerances: Tolerances,
    parallel: bool,
    state: ValidatorState,
}

impl ScenarioValidator {
    /// Creates a validator in the `Configured` state.
    ///
    /// # Errors
    /// `Config`, `InvalidTolerances` or `InvalidScenario` if the inputs are
    /// unusable.
    pub fn new(scenario: Scenario, config: ValidationConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        scenario.spots()?;

        Ok(Self {
            engine: GreeksEngine::new(config.greeks)?,
            scenario,
            tolerances: config.tolerances,
            parallel: config.parallel,
            state: ValidatorState::Configured,
        })
    }

    /// Current state.
    pub fn state(&self) -> ValidatorState {
        self.state
    }

    /// Scenario under validation.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Runs the sweep. Each call starts a fresh sweep from any state.
    ///
    /// # Errors
    /// `GridPointFailed` for the first failing spot in grid order.
    pub fn run(&mut self) -> Result<ValidationRun, ValidationError> {
        self.state = ValidatorState::Running;

        match self.sweep() {
            Ok(run) => {
                self.state = ValidatorState::Completed;
                Ok(run)
            }
            Err(err) => {
                warn!(scenario = %self.scenario.name(), error = %err, "validation run failed");
                self.state = ValidatorState::Failed;
                Err(err)
            }
        }
    }

    fn sweep(&self) -> Result<ValidationRun, ValidationError> {
        let spots = self.scenario.spots()?;
        info!(
            scenario = %self.scenario.name(),
            points = spots.len(),
            parallel = self.parallel,
            "starting validation run"
        );

        // Evaluate every point, then keep the first failure in grid order so
        // the reported error does not depend on thread scheduling.
        let outcomes: Vec<Result<[GreekSample; 3], ValidationError>> = if self.parallel {
            spots.par_iter().map(|&spot| self.evaluate_point(spot)).collect()
        } else {
            spots.iter().map(|&spot| self.evaluate_point(spot)).collect()
        };
        let points = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

        let series = GreekSeries::from_points(points);
        let report = ValidationReport::from_series(self.scenario.name(), &series, self.tolerances)?;

        for breach in report.breaches() {
            warn!(
                scenario = %self.scenario.name(),
                method = %breach.method,
                greek = %breach.greek,
                spot = breach.spot,
                deviation = breach.deviation,
                tolerance = breach.tolerance,
                "tolerance exceeded"
            );
        }
        info!(
            scenario = %self.scenario.name(),
            points = series.len(),
            passed = report.passed,
            "validation run completed"
        );

        Ok(ValidationRun { series, report })
    }

    fn evaluate_point(&self, spot: f64) -> Result<[GreekSample; 3], ValidationError> {
        let params = self
            .scenario
            .params_at(spot)
            .map_err(|err| ValidationError::GridPointFailed {
                spot,
                method: GreekMethod::Analytic,
                source: GreeksError::from(err),
            })?;

        let sample = |method: GreekMethod| {
            self.engine
                .sample(method, &params)
                .map_err(|source| ValidationError::GridPointFailed {
                    spot,
                    method,
                    source,
                })
        };

        let samples = [
            sample(GreekMethod::Analytic)?,
            sample(GreekMethod::FiniteDifference)?,
            sample(GreekMethod::ComplexStep)?,
        ];
        debug!(spot, "grid point evaluated");
        Ok(samples)
    }
}
