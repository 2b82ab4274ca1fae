//! Artifact emitter
//!
//! Renders per-method sample sequences and step-size studies to files. This
//! is the only part of the workspace that knows about output formats; the
//! numerical crates never touch the filesystem.
//!
//! | Input | Files |
//! |-------|-------|
//! | [`GreekSeries`] | `delta_plot.svg`, `gamma_plot.svg`, `greeks_samples.csv` |
//! | [`StepStudy`] | `step_study.csv`, `delta_error_plot.svg`, `gamma_error_plot.svg` |

mod plot;
mod tables;

use std::path::{Path, PathBuf};

use plotters::style::{Color, Palette, Palette99, BLUE, GREEN, RED};
use pricer_greeks::GreekMethod;
use pricer_validation::{Greek, GreekSeries, StepStudy, StudyEstimator};
use tracing::info;

use self::plot::{ChartLabels, Curve};
use crate::Result;

pub const DELTA_PLOT: &str = "delta_plot.svg";
pub const GAMMA_PLOT: &str = "gamma_plot.svg";
pub const SAMPLES_CSV: &str = "greeks_samples.csv";
pub const STEP_STUDY_CSV: &str = "step_study.csv";
pub const DELTA_ERROR_PLOT: &str = "delta_error_plot.svg";
pub const GAMMA_ERROR_PLOT: &str = "gamma_error_plot.svg";

/// Writes artifacts into a single output directory.
#[derive(Debug, Clone)]
pub struct ArtifactEmitter {
    output_dir: PathBuf,
}

impl ArtifactEmitter {
    /// Create an emitter, creating the directory if needed
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Delta and Gamma curves of all three methods plus the sample table.
    pub fn emit_series(&self, title: &str, series: &GreekSeries) -> Result<Vec<PathBuf>> {
        let delta = self.output_dir.join(DELTA_PLOT);
        let gamma = self.output_dir.join(GAMMA_PLOT);
        let samples = self.output_dir.join(SAMPLES_CSV);

        plot::render_linear(
            &delta,
            ChartLabels {
                title: &format!("{}: Delta", title),
                x: "Spot",
                y: "Delta",
            },
            &method_curves(series, Greek::Delta),
        )?;
        plot::render_linear(
            &gamma,
            ChartLabels {
                title: &format!("{}: Gamma", title),
                x: "Spot",
                y: "Gamma",
            },
            &method_curves(series, Greek::Gamma),
        )?;
        let rows = tables::write_samples(&samples, series)?;

        let written = vec![delta, gamma, samples];
        for path in &written {
            info!(path = %path.display(), "artifact written");
        }
        info!(points = series.len(), rows, "series artifacts complete");
        Ok(written)
    }

    /// Log-log error curves per Greek plus the full study table.
    pub fn emit_study(&self, title: &str, study: &StepStudy) -> Result<Vec<PathBuf>> {
        let table = self.output_dir.join(STEP_STUDY_CSV);
        let delta = self.output_dir.join(DELTA_ERROR_PLOT);
        let gamma = self.output_dir.join(GAMMA_ERROR_PLOT);

        tables::write_step_study(&table, study)?;
        for (path, greek) in [(&delta, Greek::Delta), (&gamma, Greek::Gamma)] {
            plot::render_log_log(
                path,
                ChartLabels {
                    title: &format!("{}: {} error vs step", title, greek),
                    x: "h / S",
                    y: "absolute error",
                },
                &error_curves(study, greek),
            )?;
        }

        let written = vec![table, delta, gamma];
        for path in &written {
            info!(path = %path.display(), "artifact written");
        }
        Ok(written)
    }
}

fn method_curves(series: &GreekSeries, greek: Greek) -> Vec<Curve> {
    GreekMethod::ALL
        .into_iter()
        .map(|method| {
            let color = match method {
                GreekMethod::Analytic => BLUE,
                GreekMethod::FiniteDifference => RED,
                GreekMethod::ComplexStep => GREEN,
            };
            let label = match (method, greek) {
                (GreekMethod::ComplexStep, Greek::Gamma) => "ComplexStep (hybrid)".to_string(),
                _ => method.to_string(),
            };
            let points = series
                .method(method)
                .iter()
                .map(|s| match greek {
                    Greek::Delta => (s.spot, s.delta),
                    Greek::Gamma => (s.spot, s.gamma),
                })
                .collect();
            Curve::new(label, color.to_rgba(), points)
        })
        .collect()
}

fn error_curves(study: &StepStudy, greek: Greek) -> Vec<Curve> {
    StudyEstimator::for_greek(greek)
        .enumerate()
        .map(|(i, estimator)| {
            let points = study
                .rows
                .iter()
                .filter_map(|row| row.error(estimator).map(|e| (row.relative_step, e)))
                .collect();
            Curve::new(estimator.label(), Palette99::pick(i).to_rgba(), points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_validation::{ScenarioId, ScenarioValidator, StepSizeStudy, ValidationConfig};

    #[test]
    fn test_emit_series_writes_all_files() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let run = ScenarioValidator::new(scenario, ValidationConfig::default())
            .unwrap()
            .run()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path().join("atm")).unwrap();
        let written = emitter.emit_series("ATM Reference", &run.series).unwrap();

        assert_eq!(written.len(), 3);
        for name in [DELTA_PLOT, GAMMA_PLOT, SAMPLES_CSV] {
            let path = emitter.output_dir().join(name);
            assert!(path.exists(), "{} missing", name);
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_emit_study_writes_all_files() {
        let scenario = ScenarioId::AtmReference.scenario().unwrap();
        let study = StepSizeStudy::for_scenario(&scenario).unwrap().run().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let emitter = ArtifactEmitter::new(dir.path()).unwrap();
        emitter.emit_study("ATM Reference", &study).unwrap();

        for name in [STEP_STUDY_CSV, DELTA_ERROR_PLOT, GAMMA_ERROR_PLOT] {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
    }

    #[test]
    fn test_method_curves_follow_series() {
        let scenario = ScenarioId::NearExpiryLowVol.scenario().unwrap();
        let run = ScenarioValidator::new(scenario, ValidationConfig::default())
            .unwrap()
            .run()
            .unwrap();

        let curves = method_curves(&run.series, Greek::Gamma);
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[2].label, "ComplexStep (hybrid)");
        assert_eq!(curves[0].points.len(), run.series.len());
        assert_eq!(curves[1].points[0].1, run.series.finite_difference[0].gamma);
    }
}
