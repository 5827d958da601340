//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Veil - Rule-driven anonymization with privacy certification
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.yaml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a dataset with the configured rules
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Check an anonymized dataset against the privacy thresholds
    Validate(commands::validate::ValidateArgs),

    /// Validate configuration file
    CheckConfig(commands::check::CheckConfigArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the selected command, returning the process exit code
    pub fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Anonymize(args) => args.execute(&self.config),
            Commands::Validate(args) => args.execute(&self.config),
            Commands::CheckConfig(args) => args.execute(&self.config),
            Commands::Init(args) => args.execute(),
        }
    }
}
