//! Study command implementation
//!
//! Runs a step-size study at each selected scenario's base parameters.

use pricer_validation::{ScenarioId, StepSizeStudy, StudyEstimator};
use tracing::info;

use super::selected;
use crate::artifacts::ArtifactEmitter;
use crate::config::CliConfig;
use crate::Result;

/// Run the study command
pub fn run(config: &CliConfig, scenario: Option<ScenarioId>) -> Result<()> {
    for id in selected(scenario) {
        let scenario = id.scenario()?;
        let grid = config.study;
        info!(
            scenario = %id,
            start_exponent = grid.start_exponent,
            end_exponent = grid.end_exponent,
            points = grid.points,
            "Running step-size study"
        );

        let study = StepSizeStudy::with_grid(
            *scenario.base(),
            grid.start_exponent,
            grid.end_exponent,
            grid.points,
        )?
        .run()?;

        for estimator in StudyEstimator::ALL {
            if let Some(best) = study.best_step(estimator) {
                info!(
                    scenario = %id,
                    estimator = estimator.label(),
                    best_relative_step = best,
                    "Lowest-error step"
                );
            }
        }

        let emitter = ArtifactEmitter::new(config.output_dir.join(id.slug()))?;
        emitter.emit_study(id.name(), &study)?;
    }

    info!("Step-size study complete");
    Ok(())
}
