//! # Pricer Validation (L4: Cross-method checks)
//!
//! Sweeps a Black-Scholes call across a grid of spot prices, evaluates
//! Delta and Gamma with every calculator in `pricer_greeks`, and measures
//! how far the numerical methods drift from the closed form.
//!
//! ## Components
//!
//! - [`Scenario`] and [`ScenarioId`]: base parameters plus a [`SpotSweep`]
//! - [`ScenarioValidator`]: restartable run state machine, optional rayon
//!   parallelism with deterministic output
//! - [`ValidationReport`]: scaled deviations, per-method maxima and
//!   tolerance breaches
//! - [`StepSizeStudy`]: estimator error across a logarithmic step grid
//!
//! ## Example
//!
//! ```rust
//! use pricer_validation::{ScenarioId, ScenarioValidator, ValidationConfig, ValidationOutcome};
//!
//! let scenario = ScenarioId::NearExpiryLowVol.scenario().unwrap();
//! let run = ScenarioValidator::new(scenario, ValidationConfig::default())
//!     .unwrap()
//!     .run()
//!     .unwrap();
//!
//! // Gamma curvature at σ√T ≈ 5e-4 defeats the default difference steps
//! assert!(matches!(run.outcome(), ValidationOutcome::ToleranceExceeded { .. }));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod report;
pub mod scenario;
pub mod step_study;
pub mod validator;

pub use error::ValidationError;
pub use report::{
    Deviation, Greek, GreekSeries, MethodSummary, PointDeviation, ToleranceBreach, Tolerances,
    ValidationOutcome, ValidationReport, DEFAULT_DELTA_TOLERANCE, DEFAULT_GAMMA_TOLERANCE,
};
pub use scenario::{Scenario, ScenarioId, SpotSweep};
pub use step_study::{
    StepSizeStudy, StepStudy, StepStudyRow, StudyEstimator, DEFAULT_END_EXPONENT,
    DEFAULT_START_EXPONENT, DEFAULT_STEP_COUNT,
};
pub use validator::{ScenarioValidator, ValidationConfig, ValidationRun, ValidatorState};
