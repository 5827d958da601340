//! Privacy threshold configuration
//!
//! Every check is disabled unless `enabled` is set. Quasi-identifiers are
//! declared once under `k_anonymity`; l-diversity and re-identification risk
//! reuse them unless they carry their own list.

use serde::{Deserialize, Serialize};

/// Thresholds for all privacy checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacyThresholds {
    /// k-anonymity check
    #[serde(default)]
    pub k_anonymity: KAnonymityConfig,

    /// l-diversity check
    #[serde(default)]
    pub l_diversity: LDiversityConfig,

    /// Re-identification risk check
    #[serde(default)]
    pub reidentification_risk: ReidentificationRiskConfig,
}

/// k-anonymity threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KAnonymityConfig {
    /// Run this check
    #[serde(default)]
    pub enabled: bool,

    /// Minimum equivalence class size
    #[serde(default = "default_minimum_k")]
    pub minimum_k: usize,

    /// Columns that together could identify a person
    #[serde(default)]
    pub quasi_identifiers: Vec<String>,

    /// Tolerate a share of rows in undersized classes
    #[serde(default)]
    pub allow_outliers: bool,

    /// Maximum share of rows in undersized classes (percent)
    #[serde(default)]
    pub max_outlier_percent: f64,
}

fn default_minimum_k() -> usize {
    5
}

impl Default for KAnonymityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            minimum_k: default_minimum_k(),
            quasi_identifiers: Vec::new(),
            allow_outliers: false,
            max_outlier_percent: 0.0,
        }
    }
}

/// l-diversity threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LDiversityConfig {
    /// Run this check
    #[serde(default)]
    pub enabled: bool,

    /// Minimum distinct sensitive values per class
    #[serde(default = "default_minimum_l")]
    pub minimum_l: usize,

    /// Columns whose values must stay diverse within a class
    #[serde(default)]
    pub sensitive_attributes: Vec<String>,

    /// Overrides the k-anonymity quasi-identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quasi_identifiers: Option<Vec<String>>,
}

fn default_minimum_l() -> usize {
    2
}

impl Default for LDiversityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            minimum_l: default_minimum_l(),
            sensitive_attributes: Vec::new(),
            quasi_identifiers: None,
        }
    }
}

/// Re-identification risk threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReidentificationRiskConfig {
    /// Run this check
    #[serde(default)]
    pub enabled: bool,

    /// Maximum share of high-risk rows (percent)
    #[serde(default = "default_max_risk_percent")]
    pub max_risk_percent: f64,

    /// Overrides the k-anonymity quasi-identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quasi_identifiers: Option<Vec<String>>,
}

fn default_max_risk_percent() -> f64 {
    5.0
}

impl Default for ReidentificationRiskConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_risk_percent: default_max_risk_percent(),
            quasi_identifiers: None,
        }
    }
}

impl PrivacyThresholds {
    /// Validates the thresholds
    pub fn validate(&self) -> Result<(), String> {
        if self.k_anonymity.minimum_k < 1 {
            return Err("privacy_thresholds.k_anonymity.minimum_k must be at least 1".to_string());
        }
        if !is_percent(self.k_anonymity.max_outlier_percent) {
            return Err(format!(
                "privacy_thresholds.k_anonymity.max_outlier_percent must be between 0 and 100, got {}",
                self.k_anonymity.max_outlier_percent
            ));
        }
        if self.l_diversity.minimum_l < 1 {
            return Err("privacy_thresholds.l_diversity.minimum_l must be at least 1".to_string());
        }
        if !is_percent(self.reidentification_risk.max_risk_percent) {
            return Err(format!(
                "privacy_thresholds.reidentification_risk.max_risk_percent must be between 0 and 100, got {}",
                self.reidentification_risk.max_risk_percent
            ));
        }
        Ok(())
    }

    /// Quasi-identifiers used by l-diversity
    pub fn l_diversity_quasi_identifiers(&self) -> &[String] {
        self.l_diversity
            .quasi_identifiers
            .as_deref()
            .unwrap_or(&self.k_anonymity.quasi_identifiers)
    }

    /// Quasi-identifiers used by the re-identification risk check
    pub fn risk_quasi_identifiers(&self) -> &[String] {
        self.reidentification_risk
            .quasi_identifiers
            .as_deref()
            .unwrap_or(&self.k_anonymity.quasi_identifiers)
    }
}

fn is_percent(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}
