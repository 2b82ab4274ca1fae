//! Cross-method comparison of Greek series.
//!
//! This module provides:
//! - [`GreekSeries`]: per-method sample sequences ordered by spot
//! - [`Tolerances`]: pass/fail bounds, Gamma strictly looser than Delta
//! - [`ValidationReport`]: per-spot and run-wide deviations from Analytic
//! - [`ValidationOutcome`]: pass, or the list of tolerance breaches
//!
//! ## Deviation metric
//!
//! Each numerical value x is compared with the analytic value a by
//! `|x − a|` (absolute), `|x − a| / |a|` (relative) and
//! `|x − a| / max(|a|, 1)` (scaled). The relative deviation is undefined
//! when a = 0 and is reported as `None`. The scaled deviation is relative
//! for large Greeks and absolute for small ones, so deep out-of-the-money
//! Gammas near zero do not produce spurious breaches. Tolerances apply to
//! the scaled deviation; a run passes only when every maximum is strictly
//! below its bound.

use pricer_greeks::{GreekMethod, GreekSample};
use std::fmt;

use crate::error::ValidationError;

/// Default Delta tolerance.
pub const DEFAULT_DELTA_TOLERANCE: f64 = 1e-6;

/// Default Gamma tolerance.
pub const DEFAULT_GAMMA_TOLERANCE: f64 = 1e-4;

/// The two validated sensitivities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Greek {
    /// ∂V/∂S
    Delta,
    /// ∂²V/∂S²
    Gamma,
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Greek::Delta => f.write_str("Delta"),
            Greek::Gamma => f.write_str("Gamma"),
        }
    }
}

/// Per-method sample sequences, each ordered by ascending spot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GreekSeries {
    /// Closed-form samples.
    pub analytic: Vec<GreekSample>,
    /// Finite-difference samples.
    pub finite_difference: Vec<GreekSample>,
    /// Complex-step samples (hybrid Gamma).
    pub complex_step: Vec<GreekSample>,
}

impl GreekSeries {
    /// Builds the series from per-point sample triples in grid order.
    pub fn from_points(points: Vec<[GreekSample; 3]>) -> Self {
        let mut series = Self {
            analytic: Vec::with_capacity(points.len()),
            finite_difference: Vec::with_capacity(points.len()),
            complex_step: Vec::with_capacity(points.len()),
        };
        for [analytic, fd, cs] in points {
            series.analytic.push(analytic);
            series.finite_difference.push(fd);
            series.complex_step.push(cs);
        }
        series
    }

    /// Samples of one method.
    pub fn method(&self, method: GreekMethod) -> &[GreekSample] {
        match method {
            GreekMethod::Analytic => &self.analytic,
            GreekMethod::FiniteDifference => &self.finite_difference,
            GreekMethod::ComplexStep => &self.complex_step,
        }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.analytic.len()
    }

    /// Returns `true` if the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.analytic.is_empty()
    }

    /// Grid spots.
    pub fn spots(&self) -> Vec<f64> {
        self.analytic.iter().map(|s| s.spot).collect()
    }

    /// All samples, grouped by method in [`GreekMethod::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &GreekSample> {
        self.analytic
            .iter()
            .chain(self.finite_difference.iter())
            .chain(self.complex_step.iter())
    }
}

/// Pass/fail bounds on the scaled deviation.
///
/// # Examples
/// ```
/// use pricer_validation::Tolerances;
///
/// assert!(Tolerances::new(1e-6, 1e-4).is_ok());
/// // Gamma must be strictly looser than Delta
/// assert!(Tolerances::new(1e-4, 1e-6).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Bound for Delta.
    pub delta: f64,
    /// Bound for Gamma.
    pub gamma: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA_TOLERANCE,
            gamma: DEFAULT_GAMMA_TOLERANCE,
        }
    }
}

impl Tolerances {
    /// Creates validated tolerances.
    pub fn new(delta: f64, gamma: f64) -> Result<Self, ValidationError> {
        let tolerances = Self { delta, gamma };
        tolerances.validate()?;
        Ok(tolerances)
    }

    /// Checks positivity and the Gamma > Delta ordering.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let reason = if !(self.delta.is_finite() && self.delta > 0.0) {
            Some("delta tolerance must be positive")
        } else if !(self.gamma.is_finite() && self.gamma > 0.0) {
            Some("gamma tolerance must be positive")
        } else if self.gamma <= self.delta {
            Some("gamma tolerance must be looser than delta tolerance")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidTolerances {
                delta: self.delta,
                gamma: self.gamma,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Bound for one Greek.
    pub fn for_greek(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
        }
    }
}

/// Absolute, relative and scaled deviation of one value from its reference.
///
/// # Examples
/// ```
/// use pricer_validation::Deviation;
///
/// let dev = Deviation::between(0.0101, 0.01);
/// assert!((dev.scaled - 1e-4).abs() < 1e-15);
/// assert!((dev.relative.unwrap() - 1e-2).abs() < 1e-12);
///
/// assert_eq!(Deviation::between(1e-8, 0.0).relative, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Deviation {
    /// |x − a|
    pub absolute: f64,
    /// |x − a| / |a|, `None` when a = 0
    pub relative: Option<f64>,
    /// |x − a| / max(|a|, 1)
    pub scaled: f64,
}

impl Deviation {
    /// Deviation of `value` from `reference`.
    pub fn between(value: f64, reference: f64) -> Self {
        let absolute = (value - reference).abs();
        Self {
            absolute,
            relative: (reference != 0.0).then(|| absolute / reference.abs()),
            scaled: absolute / reference.abs().max(1.0),
        }
    }

    /// Returns `true` if `self` is worse than `current`. NaN is worse than
    /// any number so a broken estimate is never reported as a pass.
    fn exceeds(&self, current: &Self) -> bool {
        self.scaled > current.scaled || (self.scaled.is_nan() && !current.scaled.is_nan())
    }
}

/// Larger of two optional relative deviations, NaN first.
fn max_relative(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(c), Some(x)) if x > c || (x.is_nan() && !c.is_nan()) => Some(x),
        (None, x) => x,
        (c, _) => c,
    }
}

/// Deviations of one numerical method from Analytic at one spot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointDeviation {
    /// Grid spot.
    pub spot: f64,
    /// Numerical method compared.
    pub method: GreekMethod,
    /// Delta deviation.
    pub delta: Deviation,
    /// Gamma deviation.
    pub gamma: Deviation,
}

/// Run-wide maxima for one numerical method.
///
/// `max_delta` and `max_gamma` are the deviations with the largest scaled
/// value. The largest relative deviations are tracked separately since they
/// may occur at other spots; spots with a zero reference are skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MethodSummary {
    /// Numerical method.
    pub method: GreekMethod,
    /// Largest Delta deviation.
    pub max_delta: Deviation,
    /// Spot of the largest Delta deviation.
    pub max_delta_spot: f64,
    /// Largest relative Delta deviation.
    pub max_delta_relative: Option<f64>,
    /// Largest Gamma deviation.
    pub max_gamma: Deviation,
    /// Spot of the largest Gamma deviation.
    pub max_gamma_spot: f64,
    /// Largest relative Gamma deviation.
    pub max_gamma_relative: Option<f64>,
}

impl MethodSummary {
    /// Maximum deviation for one Greek.
    pub fn max(&self, greek: Greek) -> (Deviation, f64) {
        match greek {
            Greek::Delta => (self.max_delta, self.max_delta_spot),
            Greek::Gamma => (self.max_gamma, self.max_gamma_spot),
        }
    }
}

/// A run-wide maximum that exceeds its tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ToleranceBreach {
    /// Numerical method.
    pub method: GreekMethod,
    /// Greek that breached.
    pub greek: Greek,
    /// Spot of the worst deviation.
    pub spot: f64,
    /// Worst scaled deviation.
    pub deviation: f64,
    /// Configured bound.
    pub tolerance: f64,
}

impl fmt::Display for ToleranceBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} deviation {:.3e} at S = {} exceeds {:.1e}",
            self.method, self.greek, self.deviation, self.spot, self.tolerance
        )
    }
}

/// Validation-level result of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationOutcome {
    /// All run-wide maxima are within tolerance.
    Passed,
    /// Methods disagree beyond the configured bounds.
    ToleranceExceeded {
        /// Every breached (method, Greek) pair
        breaches: Vec<ToleranceBreach>,
    },
}

impl ValidationOutcome {
    /// Returns `true` for [`ValidationOutcome::Passed`].
    pub fn is_passed(&self) -> bool {
        matches!(self, ValidationOutcome::Passed)
    }
}

/// Read-only comparison of FiniteDifference and ComplexStep against Analytic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationReport {
    /// Scenario name.
    pub scenario: String,
    /// Bounds applied.
    pub tolerances: Tolerances,
    /// Per-spot deviations, grouped by method then ordered by spot.
    pub points: Vec<PointDeviation>,
    /// Run-wide maxima per numerical method.
    pub summaries: Vec<MethodSummary>,
    /// `true` if every run-wide maximum is within tolerance.
    pub passed: bool,
}

impl ValidationReport {
    /// Compares `series` against its analytic samples.
    ///
    /// # Errors
    /// `InvalidScenario` if the series are misaligned (different lengths or
    /// spots), which would make a point-wise comparison meaningless.
    pub fn from_series(
        scenario: impl Into<String>,
        series: &GreekSeries,
        tolerances: Tolerances,
    ) -> Result<Self, ValidationError> {
        let mut points = Vec::with_capacity(2 * series.len());
        let mut summaries = Vec::with_capacity(2);

        for method in GreekMethod::ALL.into_iter().filter(|m| m.is_numerical()) {
            let samples = series.method(method);
            if samples.len() != series.analytic.len() {
                return Err(ValidationError::InvalidScenario {
                    reason: format!(
                        "{} series has {} points, Analytic has {}",
                        method,
                        samples.len(),
                        series.analytic.len()
                    ),
                });
            }

            let mut worst_delta: Option<(Deviation, f64)> = None;
            let mut worst_gamma: Option<(Deviation, f64)> = None;
            let mut max_delta_relative = None;
            let mut max_gamma_relative = None;

            for (reference, sample) in series.analytic.iter().zip(samples) {
                if reference.spot != sample.spot {
                    return Err(ValidationError::InvalidScenario {
                        reason: format!(
                            "{} sample at S = {} misaligned with Analytic S = {}",
                            method, sample.spot, reference.spot
                        ),
                    });
                }

                let point = PointDeviation {
                    spot: sample.spot,
                    method,
                    delta: Deviation::between(sample.delta, reference.delta),
                    gamma: Deviation::between(sample.gamma, reference.gamma),
                };

                if worst_delta.map_or(true, |(worst, _)| point.delta.exceeds(&worst)) {
                    worst_delta = Some((point.delta, point.spot));
                }
                if worst_gamma.map_or(true, |(worst, _)| point.gamma.exceeds(&worst)) {
                    worst_gamma = Some((point.gamma, point.spot));
                }
                max_delta_relative = max_relative(max_delta_relative, point.delta.relative);
                max_gamma_relative = max_relative(max_gamma_relative, point.gamma.relative);
                points.push(point);
            }

            let empty = (Deviation::default(), f64::NAN);
            let (max_delta, max_delta_spot) = worst_delta.unwrap_or(empty);
            let (max_gamma, max_gamma_spot) = worst_gamma.unwrap_or(empty);
            let summary = MethodSummary {
                method,
                max_delta,
                max_delta_spot,
                max_delta_relative,
                max_gamma,
                max_gamma_spot,
                max_gamma_relative,
            };
            summaries.push(summary);
        }

        let mut report = Self {
            scenario: scenario.into(),
            tolerances,
            points,
            summaries,
            passed: false,
        };
        report.passed = report.breaches().is_empty();
        Ok(report)
    }

    /// Run-wide maxima for one numerical method.
    pub fn summary(&self, method: GreekMethod) -> Option<&MethodSummary> {
        self.summaries.iter().find(|s| s.method == method)
    }

    /// Deviations of one method at every spot.
    pub fn deviations(&self, method: GreekMethod) -> impl Iterator<Item = &PointDeviation> {
        self.points.iter().filter(move |p| p.method == method)
    }

    /// Every run-wide maximum not strictly below its tolerance (NaN counts
    /// as a breach).
    pub fn breaches(&self) -> Vec<ToleranceBreach> {
        let mut breaches = Vec::new();
        for summary in &self.summaries {
            for greek in [Greek::Delta, Greek::Gamma] {
                let (deviation, spot) = summary.max(greek);
                let tolerance = self.tolerances.for_greek(greek);
                if !(deviation.scaled < tolerance) {
                    breaches.push(ToleranceBreach {
                        method: summary.method,
                        greek,
                        spot,
                        deviation: deviation.scaled,
                        tolerance,
                    });
                }
            }
        }
        breaches
    }

    /// Validation-level outcome.
    pub fn outcome(&self) -> ValidationOutcome {
        let breaches = self.breaches();
        if breaches.is_empty() {
            ValidationOutcome::Passed
        } else {
            ValidationOutcome::ToleranceExceeded { breaches }
        }
    }
}
