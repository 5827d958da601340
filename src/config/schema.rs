//! Configuration schema types
//!
//! This module defines the configuration structure for Veil. Rules are kept
//! in their loose file form here and turned into a validated
//! [`RuleSet`](crate::anonymization::RuleSet) by [`VeilConfig::rule_set`].

use crate::anonymization::{GlobalPolicy, RawRule, RuleSet};
use crate::domain::Result;
use crate::privacy::{PrivacyThresholds, PrivacyValidator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the YAML or TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Free-form description of the rule set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Anonymization rules keyed by PII type
    #[serde(default)]
    pub rules: BTreeMap<String, RawRule>,

    /// Policy flags applying to every rule
    #[serde(default)]
    pub global: GlobalPolicy,

    /// Privacy certification thresholds
    #[serde(default)]
    pub privacy_thresholds: PrivacyThresholds,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: None,
            rules: BTreeMap::new(),
            global: GlobalPolicy::default(),
            privacy_thresholds: PrivacyThresholds::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl VeilConfig {
    /// Validates the non-rule sections of the configuration
    ///
    /// Rules are validated by [`VeilConfig::rule_set`], which reports the
    /// offending PII type and parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("version cannot be empty".to_string());
        }
        self.global.validate()?;
        self.privacy_thresholds.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the validated rule set
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the first invalid rule.
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::from_config(&self.rules, self.global.clone())
    }

    /// Builds a validator for the configured thresholds
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the thresholds are invalid.
    pub fn privacy_validator(&self) -> Result<PrivacyValidator> {
        PrivacyValidator::new(self.privacy_thresholds.clone())
    }
}

/// Log rotation strategy for the local log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// One file per day
    #[default]
    Daily,
    /// One file per hour
    Hourly,
    /// A single file
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default)]
    pub local_rotation: LogRotation,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: LogRotation::Daily,
        }
    }
}

// Default value functions
fn default_version() -> String {
    "1.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}
