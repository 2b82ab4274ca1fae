//! Check command implementation
//!
//! Validates the resolved configuration, confirms the output directory is
//! writable, and prices the ATM reference point with every method.

use std::path::Path;

use pricer_greeks::GreeksEngine;
use pricer_validation::{ScenarioId, StepSizeStudy, ValidationError};
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

const WRITE_MARKER: &str = ".greeks-write-check";

/// Run the check command
pub fn run(config: &CliConfig) -> Result<()> {
    info!("Checking configuration...");
    config.validate()?;
    info!(
        output_dir = %config.output_dir.display(),
        log_level = %config.log_level,
        parallel = config.parallel,
        strict = config.strict,
        delta_tolerance = config.tolerances.delta,
        gamma_tolerance = config.tolerances.gamma,
        "Configuration valid"
    );

    probe_writable(&config.output_dir)?;
    info!(path = %config.output_dir.display(), "Output directory writable");

    let scenario = ScenarioId::AtmReference.scenario()?;
    let engine = GreeksEngine::new(config.greeks.clone()).map_err(ValidationError::from)?;
    for sample in engine.sample_all(scenario.base())? {
        info!(
            method = %sample.method,
            gamma_estimator = %sample.gamma_estimator,
            delta = sample.delta,
            gamma = sample.gamma,
            "Kernel probe"
        );
    }

    let grid = config.study;
    let study = StepSizeStudy::with_grid(
        *scenario.base(),
        grid.start_exponent,
        grid.end_exponent,
        grid.points,
    )?;
    info!(steps = study.relative_steps().len(), "Step-size grid valid");

    info!("All checks passed");
    Ok(())
}

fn probe_writable(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let marker = dir.join(WRITE_MARKER);
    std::fs::write(&marker, b"ok")?;
    std::fs::remove_file(&marker)?;
    Ok(())
}
