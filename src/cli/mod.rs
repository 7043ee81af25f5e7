//! CLI interface and argument parsing
//!
//! This module provides the `healthid` command-line interface using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig, SdkConfig};
use clap::{Parser, Subcommand};

/// Level used when neither `--log-level` nor a configuration file sets one
const DEFAULT_LOG_LEVEL: &str = "warn";

/// healthid - drive ABHA and HPR registration steps from the shell
#[derive(Parser, Debug)]
#[command(name = "healthid")]
#[command(version, about, long_about = None)]
#[command(author = "HealthID Flow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "healthid.toml", env = "HEALTHID_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HEALTHID_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one registration step and print the result as JSON
    Step(commands::step::StepArgs),

    /// Show the transition table of a flow
    Steps(commands::steps::StepsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and `[logging]` section to initialize logging with
    ///
    /// Commands that read the configuration file take both from it, with
    /// `--log-level` still winning. A configuration that fails to load is
    /// reported later by the command itself.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = match self.command {
            Commands::Step(_) | Commands::ValidateConfig(_) => load_config(&self.config).ok(),
            Commands::Steps(_) | Commands::Init(_) => None,
        };
        resolve_logging(self.log_level.as_deref(), config.as_ref())
    }
}

fn resolve_logging(cli_level: Option<&str>, config: Option<&SdkConfig>) -> (String, LoggingConfig) {
    let level = cli_level
        .map(str::to_string)
        .or_else(|| config.map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let logging = config.map(|c| c.logging.clone()).unwrap_or_default();
    (level, logging)
}
