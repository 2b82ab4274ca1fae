//! CLI configuration management
//!
//! Handles loading configuration from a TOML file, environment variables and
//! CLI arguments.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`GREEKS_OUTPUT_DIR`, `GREEKS_LOG_LEVEL`, `GREEKS_PARALLEL`)
//! 3. Config file
//! 4. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_greeks::GreeksConfig;
use pricer_validation::{
    Tolerances, ValidationConfig, DEFAULT_END_EXPONENT, DEFAULT_START_EXPONENT,
    DEFAULT_STEP_COUNT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the artifact directory.
pub const ENV_OUTPUT_DIR: &str = "GREEKS_OUTPUT_DIR";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "GREEKS_LOG_LEVEL";
/// Environment variable enabling parallel sweeps.
pub const ENV_PARALLEL: &str = "GREEKS_PARALLEL";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid boolean for {variable}: {value}")]
    InvalidFlag { variable: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid step-study grid: 10^{start} .. 10^{end} with {points} points")]
    InvalidStudyGrid { start: f64, end: f64, points: usize },

    #[error("Invalid validation settings: {0}")]
    Validation(#[from] pricer_validation::ValidationError),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_filter_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        LogLevel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Step-size study grid: `points` relative steps 10^start .. 10^end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyGrid {
    pub start_exponent: f64,
    pub end_exponent: f64,
    pub points: usize,
}

impl Default for StudyGrid {
    fn default() -> Self {
        Self {
            start_exponent: DEFAULT_START_EXPONENT,
            end_exponent: DEFAULT_END_EXPONENT,
            points: DEFAULT_STEP_COUNT,
        }
    }
}

/// Complete CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Root directory for artifacts; each scenario writes into its own subdirectory
    pub output_dir: PathBuf,
    pub log_level: LogLevel,
    /// Evaluate grid points on the rayon pool
    pub parallel: bool,
    /// Exit non-zero when a scenario exceeds tolerance
    pub strict: bool,
    pub greeks: GreeksConfig,
    pub tolerances: Tolerances,
    pub study: StudyGrid,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./artifacts"),
            log_level: LogLevel::Info,
            parallel: false,
            strict: false,
            greeks: GreeksConfig::default(),
            tolerances: Tolerances::default(),
            study: StudyGrid::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(flag) = lookup(ENV_PARALLEL) {
            self.parallel = parse_flag(ENV_PARALLEL, &flag)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if cli.parallel {
            self.parallel = true;
        }
        if cli.strict {
            self.strict = true;
        }
        Ok(())
    }

    /// Validate step sizes, tolerances and the study grid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation().validate()?;

        let grid = self.study;
        if grid.points < 2
            || !grid.start_exponent.is_finite()
            || !grid.end_exponent.is_finite()
            || grid.start_exponent >= grid.end_exponent
        {
            return Err(ConfigError::InvalidStudyGrid {
                start: grid.start_exponent,
                end: grid.end_exponent,
                points: grid.points,
            });
        }
        Ok(())
    }

    /// Settings handed to the scenario validator
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            greeks: self.greeks.clone(),
            tolerances: self.tolerances,
            parallel: self.parallel,
        }
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            variable,
            value: value.to_string(),
        }),
    }
}

/// Configuration-relevant CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub parallel: bool,
    pub strict: bool,
}

/// Build configuration from all sources using the process environment
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// Build configuration with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
