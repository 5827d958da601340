//! Validate command implementation
//!
//! This module implements the `validate` command, which certifies an
//! already-anonymized dataset against the configured privacy thresholds.

use super::read_dataset;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Anonymized dataset (JSON array of records)
    #[arg(short, long)]
    pub input: String,

    /// Original dataset, used as the k-anonymity baseline
    #[arg(long)]
    pub original: Option<String>,

    /// Print the result as JSON instead of the console report
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, input = %self.input, "Validating privacy");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let validator = match config.privacy_validator() {
            Ok(v) => v,
            Err(e) => {
                println!("❌ Invalid privacy thresholds");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let anonymized = read_dataset(&self.input)?;
        let original = self.original.as_deref().map(read_dataset).transpose()?;

        let thresholds = validator.thresholds();
        if !thresholds.k_anonymity.enabled
            && !thresholds.l_diversity.enabled
            && !thresholds.reidentification_risk.enabled
        {
            println!("⚠️  No privacy checks are enabled in {config_path}");
        }

        let result = validator.validate(&anonymized, original.as_ref());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result.format_console());
        }

        Ok(if result.passed { 0 } else { 1 })
    }
}
