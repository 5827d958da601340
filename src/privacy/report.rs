//! Privacy validation results
//!
//! Results are plain data: a failed check is a [`ValidationResult`] with
//! `passed = false`, never an error. Field names are stable and serialize
//! straight to JSON.

use serde::{Deserialize, Serialize};

/// Outcome of the k-anonymity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KAnonymityCheck {
    pub passed: bool,
    pub message: String,

    /// Smallest equivalence class size
    pub min_k: usize,

    /// Mean equivalence class size
    pub avg_k: f64,

    pub required_k: usize,

    /// Number of equivalence classes
    pub equivalence_classes: usize,

    /// Quasi-identifiers found in the dataset
    pub quasi_identifiers: Vec<String>,

    /// Share of rows in undersized classes, when outliers are allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_percent: Option<f64>,

    /// `min_k` of the original dataset over the same quasi-identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_min_k: Option<usize>,
}

/// Outcome of the l-diversity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LDiversityCheck {
    pub passed: bool,
    pub message: String,

    /// Fewest distinct sensitive values in any class, `None` when not applicable
    pub min_l: Option<usize>,

    /// Mean distinct sensitive values per class, `None` when not applicable
    pub avg_l: Option<f64>,

    pub required_l: usize,

    /// Sensitive attributes found in the dataset
    pub sensitive_attributes: Vec<String>,

    /// Quasi-identifiers found in the dataset
    pub quasi_identifiers: Vec<String>,
}

/// Outcome of the re-identification risk check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReidentificationRiskCheck {
    pub passed: bool,
    pub message: String,

    /// Rows in classes of size 2 or less
    pub high_risk_count: usize,
    pub high_risk_percent: f64,

    /// Rows in classes of size 3 or 4
    pub medium_risk_count: usize,
    pub medium_risk_percent: f64,

    /// Rows in classes of size 5 or more
    pub low_risk_count: usize,
    pub low_risk_percent: f64,

    pub max_risk_percent: f64,

    /// Quasi-identifiers found in the dataset
    pub quasi_identifiers: Vec<String>,
}

/// Results of the enabled checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_anonymity: Option<KAnonymityCheck>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l_diversity: Option<LDiversityCheck>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reidentification_risk: Option<ReidentificationRiskCheck>,
}

impl ValidationChecks {
    /// Names of the checks that failed, in check order
    pub fn failed(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if self.k_anonymity.as_ref().is_some_and(|c| !c.passed) {
            failed.push("k_anonymity");
        }
        if self.l_diversity.as_ref().is_some_and(|c| !c.passed) {
            failed.push("l_diversity");
        }
        if self.reidentification_risk.as_ref().is_some_and(|c| !c.passed) {
            failed.push("reidentification_risk");
        }
        failed
    }
}

/// Overall privacy validation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Conjunction of all enabled checks
    pub passed: bool,
    pub checks: ValidationChecks,
    pub summary: String,
}

impl ValidationResult {
    /// Builds a result from check outcomes, deriving `passed` and `summary`
    pub fn from_checks(checks: ValidationChecks) -> Self {
        let failed = checks.failed();
        let summary = if failed.is_empty() {
            "All privacy checks passed".to_string()
        } else {
            format!("Privacy validation failed: {}", failed.join(", "))
        };
        Self {
            passed: failed.is_empty(),
            checks,
            summary,
        }
    }

    /// Format the result for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  PRIVACY VALIDATION REPORT                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        let icon = if self.passed { "✅" } else { "❌" };
        output.push_str(&format!("{icon} Overall Status: {}\n", self.summary));
        output.push('\n');

        if let Some(check) = &self.checks.k_anonymity {
            push_header(&mut output, "K-ANONYMITY", check.passed, &check.message);
            output.push_str(&format!("  Minimum k:             {}\n", check.min_k));
            output.push_str(&format!("  Average k:             {:.2}\n", check.avg_k));
            output.push_str(&format!("  Required k:            {}\n", check.required_k));
            output.push_str(&format!(
                "  Equivalence classes:   {}\n",
                check.equivalence_classes
            ));
            if let Some(baseline) = check.baseline_min_k {
                output.push_str(&format!("  Original minimum k:    {baseline}\n"));
            }
            output.push('\n');
        }

        if let Some(check) = &self.checks.l_diversity {
            push_header(&mut output, "L-DIVERSITY", check.passed, &check.message);
            if let (Some(min_l), Some(avg_l)) = (check.min_l, check.avg_l) {
                output.push_str(&format!("  Minimum l:             {min_l}\n"));
                output.push_str(&format!("  Average l:             {avg_l:.2}\n"));
                output.push_str(&format!("  Required l:            {}\n", check.required_l));
            }
            output.push('\n');
        }

        if let Some(check) = &self.checks.reidentification_risk {
            push_header(&mut output, "RE-IDENTIFICATION RISK", check.passed, &check.message);
            output.push_str(&format!(
                "  High risk:             {:.1}% ({} records)\n",
                check.high_risk_percent, check.high_risk_count
            ));
            output.push_str(&format!(
                "  Medium risk:           {:.1}% ({} records)\n",
                check.medium_risk_percent, check.medium_risk_count
            ));
            output.push_str(&format!(
                "  Low risk:              {:.1}% ({} records)\n",
                check.low_risk_percent, check.low_risk_count
            ));
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }
}

fn push_header(output: &mut String, name: &str, passed: bool, message: &str) {
    let status = if passed { "✅ PASSED" } else { "❌ FAILED" };
    output.push_str(&format!("🔒 {name}: {status}\n"));
    output.push_str("───────────────────────────────────────────────────────────────\n");
    output.push_str(&format!("  {message}\n"));
}
