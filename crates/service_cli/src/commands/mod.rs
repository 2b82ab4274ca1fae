//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod run;
pub mod scenarios;
pub mod study;

use pricer_validation::ScenarioId;

/// Presets selected by an optional `--scenario` argument.
pub fn selected(scenario: Option<ScenarioId>) -> Vec<ScenarioId> {
    match scenario {
        Some(id) => vec![id],
        None => ScenarioId::ALL.to_vec(),
    }
}
