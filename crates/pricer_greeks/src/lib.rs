//! # Pricer Greeks (L3: Sensitivities)
//!
//! Delta and Gamma of a Black-Scholes European call, computed three
//! independent ways from the same pricing kernel:
//!
//! - [`AnalyticGreeks`]: closed form, the reference for validation
//! - [`FiniteDifferenceGreeks`]: real spot bumps with exposed step sizes
//! - [`ComplexStepGreeks`]: imaginary spot perturbation; Gamma uses the
//!   hybrid estimator and is tagged [`GammaEstimator::HybridComplexStep`]
//!
//! [`GreeksEngine`] bundles the three behind a single [`GreeksConfig`].
//!
//! ## Design Principles
//!
//! - **One kernel**: every method evaluates `pricer_models::analytical::BlackScholes`
//! - **Visible steps**: numerical samples carry the realised perturbations
//! - **No silent garbage**: degenerate steps fail with `InvalidStepSize`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytic;
pub mod calculator;
pub mod complex_step;
pub mod config;
pub mod engine;
pub mod error;
pub mod finite_difference;
pub mod method;
pub mod sample;

pub use analytic::AnalyticGreeks;
pub use calculator::GreeksCalculator;
pub use complex_step::ComplexStepGreeks;
pub use config::{DifferenceScheme, GreeksConfig, GreeksConfigBuilder, GreeksConfigError};
pub use engine::GreeksEngine;
pub use error::GreeksError;
pub use finite_difference::FiniteDifferenceGreeks;
pub use method::{GammaEstimator, GreekMethod};
pub use sample::{Estimate, GreekSample, StepSizes};
