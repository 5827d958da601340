//! Anonymize command implementation
//!
//! Applies the configured rules to a dataset, writes the result and
//! optionally certifies it against the privacy thresholds.

use super::{exit_code_for, read_dataset, write_dataset};
use crate::anonymization::{Anonymizer, ColumnMapping, ScanReport};
use crate::config::load_config;
use anyhow::Context;
use clap::Args;
use std::fs;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input dataset (JSON array of records)
    #[arg(short, long)]
    pub input: String,

    /// Output path for the anonymized dataset
    #[arg(short, long)]
    pub output: String,

    /// Column mapping file (JSON object of column name to PII type)
    #[arg(short, long, conflicts_with = "scan")]
    pub mapping: Option<String>,

    /// PII scan report to derive the column mapping from
    #[arg(long)]
    pub scan: Option<String>,

    /// Validate privacy thresholds on the anonymized output
    #[arg(long)]
    pub validate: bool,

    /// Print anonymization statistics
    #[arg(long)]
    pub stats: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, input = %self.input, "Anonymizing dataset");

        println!("🔒 Anonymizing dataset: {}", self.input);
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let rules = match config.rule_set() {
            Ok(rules) => rules,
            Err(e) => {
                println!("❌ Invalid anonymization rules");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mapping = self.load_mapping()?;
        let dataset = read_dataset(&self.input)?;

        let anonymizer = Anonymizer::new(rules);
        let (anonymized, stats) = match anonymizer.anonymize(&dataset, mapping.as_ref()) {
            Ok(result) => result,
            Err(e) => {
                println!("❌ Anonymization failed");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        write_dataset(&self.output, &anonymized)?;

        println!(
            "✅ Anonymized {} of {} columns ({} rows)",
            stats.columns_anonymized, stats.columns_processed, stats.rows_processed
        );
        println!("   Output: {}", self.output);

        if stats.has_errors() {
            println!();
            println!("⚠️  {} column(s) could not be anonymized:", stats.errors.len());
            for error in &stats.errors {
                println!("   - {error}");
            }
        }

        if self.stats {
            println!("{}", stats.format_console());
        }

        if self.validate {
            let validator = match config.privacy_validator() {
                Ok(v) => v,
                Err(e) => {
                    println!("❌ Invalid privacy thresholds");
                    println!("   Error: {e}");
                    return Ok(2);
                }
            };
            let result = validator.validate(&anonymized, Some(&dataset));
            println!("{}", result.format_console());
            if !result.passed {
                return Ok(1);
            }
        }

        Ok(0)
    }

    fn load_mapping(&self) -> anyhow::Result<Option<ColumnMapping>> {
        if let Some(path) = &self.mapping {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read column mapping {path}"))?;
            let mapping: ColumnMapping = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse column mapping {path}"))?;
            return Ok(Some(mapping));
        }

        if let Some(path) = &self.scan {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read scan report {path}"))?;
            let report: ScanReport = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse scan report {path}"))?;
            let mapping = ColumnMapping::from_scan(&report);
            tracing::debug!(columns = mapping.len(), "Column mapping derived from scan report");
            return Ok(Some(mapping));
        }

        Ok(None)
    }
}
