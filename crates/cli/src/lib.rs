//! inventory-relay CLI
//!
//! Argument parsing, command dispatch and logging setup for the
//! `inventory-relay` binary.

pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use inventory_relay_config::{ConfigError, RelayConfig};
use processor::ProcessorError;
use std::path::PathBuf;
use thiserror::Error;

use commands::{ConfigCommand, RunArgs};

/// CLI errors
///
/// Rendered by `main` as `Error: <stage>: <cause>`.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("{}: {}", .0.stage(), .0)]
    Pipeline(#[from] ProcessorError),

    #[error("output: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(
    name = "inventory-relay",
    version,
    about = "Relay inventory records between Kafka topics",
    long_about = "Consumes inventory records from a source topic, zeroes quantities below a \
                  threshold, and republishes them to a destination topic.\n\n\
                  Configuration is layered: defaults, then the YAML file given with --config, \
                  then INVENTORY_RELAY_* environment variables, then command-line flags."
)]
pub struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "INVENTORY_RELAY_CONFIG",
        help = "Path to a YAML configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    /// JSON logs
    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline until interrupted
    #[command(name = "run", about = "Run the relay pipeline until Ctrl-C")]
    Run(RunArgs),

    /// Configuration management
    #[command(name = "config", about = "Inspect and validate configuration")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

impl Cli {
    /// Load configuration and fold in the global logging flags
    pub fn load_config(&self) -> CliResult<RelayConfig> {
        let mut config = RelayConfig::load(self.config.as_deref())?;

        if self.verbose {
            config.observability.log_level = "debug".to_string();
        }
        if self.json_logs {
            config.observability.json_logging = true;
        }

        Ok(config)
    }
}
