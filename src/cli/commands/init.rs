//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! rule file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.yaml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} to match your PII types", self.output);
                println!("  2. Set the quasi-identifiers under privacy_thresholds");
                println!("  3. Validate configuration: veil check-config");
                println!("  4. Run: veil anonymize --input data.json --output anon.json --validate");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Sample rule file covering every strategy family
pub fn sample_config() -> &'static str {
    r#"# Veil Configuration File
# Rule-driven anonymization with privacy certification

version: "1.0"
description: "Sample anonymization rules"

# One rule per PII type. Columns are matched to PII types by a column
# mapping or a scan report, or by column name when neither is given.
rules:
  email:
    strategy: hash
    parameters:
      algorithm: sha256   # sha256 | sha512 | md5
      salt: true

  phone:
    strategy: redact_partial
    parameters:
      visible_chars: 4
      mask_char: "*"

  ssn:
    strategy: redact_full
    parameters:
      replacement: "[REDACTED]"

  name:
    strategy: pseudonymize
    parameters:
      seed_based: true    # same input, same pseudonym
      locale: en_US       # en_US | fr_FR | pt_BR | ja_JP | zh_CN | zh_TW

  age:
    strategy: generalize
    parameters:
      bin_size: 10
      min_value: 0
      max_value: 100

  date_of_birth:
    strategy: generalize
    parameters:
      granularity: year   # day | week | month | quarter | year

  address:
    strategy: generalize
    parameters:
      level: city         # full | street | city | state | country

  ip_address:
    strategy: generalize
    parameters:
      octets: 3           # leading octets kept, the rest zeroed (1-4)

  zip_code:
    strategy: generalize
    parameters:
      precision: 3        # leading characters kept, the rest masked

global:
  handle_nulls: true
  preserve_data_types: true
  case_sensitive: false
  pseudonym_cache_capacity: 100000

privacy_thresholds:
  k_anonymity:
    enabled: true
    minimum_k: 5
    quasi_identifiers: [age, zip_code]
    allow_outliers: true
    max_outlier_percent: 5.0

  l_diversity:
    enabled: false
    minimum_l: 2
    sensitive_attributes: [diagnosis]

  reidentification_risk:
    enabled: true
    max_risk_percent: 5.0

logging:
  level: info
  local_enabled: false
  local_path: ./logs
  local_rotation: daily   # daily | hourly | never
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_sample_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.yaml");
        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 0);

        let config = load_config(&path).unwrap();
        assert_eq!(config.rule_set().unwrap().len(), 9);
        assert!(config.privacy_thresholds.k_anonymity.enabled);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.yaml");
        fs::write(&path, "keep me").unwrap();

        let mut args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        args.force = true;
        assert_eq!(args.execute().unwrap(), 0);
        assert_ne!(fs::read_to_string(&path).unwrap(), "keep me");
    }
}
