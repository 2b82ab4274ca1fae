//! Greeks CLI - Command Line Operations for Greeks Validation
//!
//! Runs the Black-Scholes Delta/Gamma cross-method validation scenarios and
//! writes their artifacts.
//!
//! # Commands
//!
//! - `greeks run [--scenario <id>]` - Validate scenarios and emit curves, samples and report
//! - `greeks study [--scenario <id>]` - Step-size study with error curves
//! - `greeks scenarios` - List the preset scenarios
//! - `greeks check` - Check configuration and kernel health
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate is the only place that
//! touches the filesystem; the pricer crates stay pure.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricer_validation::ScenarioId;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod artifacts;
mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliArgs, LogLevel};

/// Black-Scholes Greeks validation CLI
#[derive(Parser)]
#[command(name = "greeks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "GREEKS_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory for artifacts
    #[arg(short, long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Evaluate grid points in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Exit non-zero when a scenario exceeds tolerance
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenarios and emit artifacts
    Run {
        /// Scenario id (1, 2 or slug); all presets when omitted
        #[arg(short, long)]
        scenario: Option<ScenarioId>,
    },

    /// Sweep step sizes and emit error curves
    Study {
        /// Scenario id (1, 2 or slug); all presets when omitted
        #[arg(short, long)]
        scenario: Option<ScenarioId>,
    },

    /// List preset scenarios
    Scenarios,

    /// Check configuration and kernel health
    Check,
}

impl From<&Cli> for CliArgs {
    fn from(cli: &Cli) -> Self {
        CliArgs {
            config_file: cli.config.clone(),
            output_dir: cli.output_dir.clone(),
            log_level: cli.log_level.clone(),
            parallel: cli.parallel,
            strict: cli.strict,
        }
    }
}

fn init_tracing(log_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliArgs::from(&cli))?;

    init_tracing(config.log_level);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        output_dir = %config.output_dir.display(),
        parallel = config.parallel,
        "Greeks CLI configuration loaded"
    );

    match cli.command {
        Commands::Run { scenario } => {
            for result in commands::run::run(&config, scenario)? {
                info!(
                    scenario = %result.id,
                    passed = result.outcome.is_passed(),
                    output_dir = %result.output_dir.display(),
                    "Scenario artifacts ready"
                );
            }
        }
        Commands::Study { scenario } => commands::study::run(&config, scenario)?,
        Commands::Scenarios => commands::scenarios::run()?,
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
