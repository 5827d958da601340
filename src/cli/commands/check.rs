//! Check config command implementation
//!
//! This module implements the `check-config` command for validating
//! the Veil configuration file and every rule in it.

use crate::config::load_config;
use clap::Args;

/// Arguments for the check-config command
#[derive(Args, Debug)]
pub struct CheckConfigArgs {}

impl CheckConfigArgs {
    /// Execute the check-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates thresholds and rules
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Version: {}", config.version);
        if let Some(description) = &config.description {
            println!("  Description: {description}");
        }
        println!("  Rules: {}", config.rules.len());
        for (pii_type, rule) in &config.rules {
            println!("    {pii_type}: {}", rule.strategy);
        }
        println!("  Handle Nulls: {}", config.global.handle_nulls);
        println!("  Preserve Data Types: {}", config.global.preserve_data_types);
        println!("  Case Sensitive: {}", config.global.case_sensitive);
        println!(
            "  Pseudonym Cache Capacity: {}",
            config.global.pseudonym_cache_capacity
        );

        let thresholds = &config.privacy_thresholds;
        println!(
            "  k-Anonymity: {}",
            enabled_label(thresholds.k_anonymity.enabled, || format!(
                "k >= {}",
                thresholds.k_anonymity.minimum_k
            ))
        );
        println!(
            "  l-Diversity: {}",
            enabled_label(thresholds.l_diversity.enabled, || format!(
                "l >= {}",
                thresholds.l_diversity.minimum_l
            ))
        );
        println!(
            "  Re-identification Risk: {}",
            enabled_label(thresholds.reidentification_risk.enabled, || format!(
                "<= {}%",
                thresholds.reidentification_risk.max_risk_percent
            ))
        );
        println!("  Log Level: {}", config.logging.level);
        println!();

        Ok(0)
    }
}

fn enabled_label(enabled: bool, detail: impl FnOnce() -> String) -> String {
    if enabled {
        format!("enabled ({})", detail())
    } else {
        "disabled".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_valid_config_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.yaml");
        fs::write(&path, "rules:\n  ssn:\n    strategy: redact_full\n").unwrap();
        let code = CheckConfigArgs {}.execute(path.to_str().unwrap()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_invalid_rule_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.yaml");
        fs::write(&path, "rules:\n  ssn:\n    strategy: shred\n").unwrap();
        let code = CheckConfigArgs {}.execute(path.to_str().unwrap()).unwrap();
        assert_eq!(code, 2);
    }

    #[test]
    fn test_enabled_label() {
        assert_eq!(enabled_label(false, || unreachable!()), "disabled");
        assert_eq!(enabled_label(true, || "k >= 5".into()), "enabled (k >= 5)");
    }
}
