// Veil - Rule-driven anonymization with privacy certification
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use veil::cli::Cli;
use veil::config::{load_config, LoggingConfig};
use veil::logging::init_logging;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands report configuration problems themselves; logging falls back
    // to console-only defaults until the file is valid.
    let logging_config = load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig::default());
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| logging_config.level.clone());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Veil starting");

    let exit_code = match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            veil::log_error_with_context!(&e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}
