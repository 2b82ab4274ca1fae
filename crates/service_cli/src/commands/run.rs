//! Run command implementation
//!
//! Validates each selected scenario and writes its curves, sample and
//! deviation tables and JSON report into `<output_dir>/<scenario-slug>/`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pricer_validation::{
    Scenario, ScenarioId, ScenarioValidator, ValidationConfig, ValidationOutcome, ValidationReport,
};
use serde::Serialize;
use tracing::{info, warn};

use super::selected;
use crate::artifacts::ArtifactEmitter;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// File name of the per-scenario JSON report.
pub const REPORT_JSON: &str = "validation_report.json";

/// File name of the per-spot deviation table.
pub const DEVIATIONS_CSV: &str = "deviations.csv";

#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    scenario: &'a Scenario,
    config: &'a ValidationConfig,
    outcome: &'static str,
    report: &'a ValidationReport,
}

/// Outcome of one scenario as seen by the command.
#[derive(Debug)]
pub struct ScenarioResult {
    pub id: ScenarioId,
    pub output_dir: PathBuf,
    pub outcome: ValidationOutcome,
}

/// Run the run command
pub fn run(config: &CliConfig, scenario: Option<ScenarioId>) -> Result<Vec<ScenarioResult>> {
    let mut results = Vec::new();
    for id in selected(scenario) {
        results.push(run_scenario(config, id)?);
    }

    if config.strict {
        if let Some(failed) = results.iter().find(|r| !r.outcome.is_passed()) {
            let breaches = match &failed.outcome {
                ValidationOutcome::ToleranceExceeded { breaches } => breaches.len(),
                ValidationOutcome::Passed => 0,
            };
            return Err(CliError::ToleranceExceeded {
                scenario: failed.id.name().to_string(),
                breaches,
            });
        }
    }
    Ok(results)
}

fn run_scenario(config: &CliConfig, id: ScenarioId) -> Result<ScenarioResult> {
    let scenario = id.scenario()?;
    let validation = config.validation();
    info!(scenario = %id, description = id.description(), "Running scenario");

    let mut validator = ScenarioValidator::new(scenario, validation.clone())?;
    let run = validator.run()?;

    let output_dir = config.output_dir.join(id.slug());
    let emitter = ArtifactEmitter::new(&output_dir)?;
    emitter.emit_series(id.name(), &run.series)?;

    let outcome = run.outcome();
    let document = ReportDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        scenario: validator.scenario(),
        config: &validation,
        outcome: if outcome.is_passed() {
            "passed"
        } else {
            "tolerance_exceeded"
        },
        report: &run.report,
    };
    let report_path = output_dir.join(REPORT_JSON);
    serde_json::to_writer_pretty(BufWriter::new(File::create(&report_path)?), &document)?;
    info!(path = %report_path.display(), "artifact written");

    let deviations_path = output_dir.join(DEVIATIONS_CSV);
    let rows = write_deviations(&deviations_path, &run.report)?;
    info!(path = %deviations_path.display(), rows, "artifact written");

    match &outcome {
        ValidationOutcome::Passed => info!(scenario = %id, "Scenario passed"),
        ValidationOutcome::ToleranceExceeded { breaches } => {
            for breach in breaches {
                warn!("{}", breach);
            }
            warn!(scenario = %id, breaches = breaches.len(), "Scenario exceeded tolerance");
        }
    }

    Ok(ScenarioResult {
        id,
        output_dir,
        outcome,
    })
}

#[derive(Debug, Serialize)]
struct DeviationRecord<'a> {
    spot: f64,
    method: &'a str,
    delta_absolute: f64,
    delta_relative: Option<f64>,
    delta_scaled: f64,
    gamma_absolute: f64,
    gamma_relative: Option<f64>,
    gamma_scaled: f64,
}

/// One row per (method, spot) with the deviations from Analytic. Relative
/// cells are empty where the analytic value is zero.
fn write_deviations(path: &Path, report: &ValidationReport) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    for point in &report.points {
        writer.serialize(DeviationRecord {
            spot: point.spot,
            method: point.method.name(),
            delta_absolute: point.delta.absolute,
            delta_relative: point.delta.relative,
            delta_scaled: point.delta.scaled,
            gamma_absolute: point.gamma.absolute,
            gamma_relative: point.gamma.relative,
            gamma_scaled: point.gamma.scaled,
        })?;
    }

    writer.flush()?;
    Ok(report.points.len())
}
