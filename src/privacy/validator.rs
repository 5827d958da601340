//! Privacy validator
//!
//! Certifies an anonymized dataset against k-anonymity, l-diversity and
//! re-identification risk thresholds. Equivalence classes are computed once
//! per distinct quasi-identifier set and shared by every check that uses it.

use crate::domain::{Dataset, Result, VeilError};
use crate::privacy::equivalence::{ClassCache, EquivalenceClasses};
use crate::privacy::report::{
    KAnonymityCheck, LDiversityCheck, ReidentificationRiskCheck, ValidationChecks,
    ValidationResult,
};
use crate::privacy::thresholds::PrivacyThresholds;

/// Largest class size counted as high risk
const HIGH_RISK_MAX_CLASS: usize = 2;
/// Largest class size counted as medium risk
const MEDIUM_RISK_MAX_CLASS: usize = 4;

/// Validates datasets against privacy thresholds
#[derive(Debug, Clone)]
pub struct PrivacyValidator {
    thresholds: PrivacyThresholds,
}

impl PrivacyValidator {
    /// Create a validator
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] if the thresholds are invalid.
    pub fn new(thresholds: PrivacyThresholds) -> Result<Self> {
        thresholds.validate().map_err(VeilError::Configuration)?;
        Ok(Self { thresholds })
    }

    /// Thresholds applied by this validator
    pub fn thresholds(&self) -> &PrivacyThresholds {
        &self.thresholds
    }

    /// Validate an anonymized dataset
    ///
    /// Only enabled checks run; `passed` is their conjunction. When the
    /// original dataset is supplied, its `min_k` over the same
    /// quasi-identifiers is reported as a baseline.
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::domain::{Dataset, Value};
    /// use veil::privacy::{PrivacyThresholds, PrivacyValidator};
    ///
    /// # fn example() -> veil::domain::Result<()> {
    /// let mut thresholds = PrivacyThresholds::default();
    /// thresholds.k_anonymity.enabled = true;
    /// thresholds.k_anonymity.minimum_k = 2;
    /// thresholds.k_anonymity.quasi_identifiers = vec!["age".into()];
    ///
    /// let data = Dataset::from_columns([("age", vec![Value::from("30-39"); 4])])?;
    /// let result = PrivacyValidator::new(thresholds)?.validate(&data, None);
    /// assert!(result.passed);
    /// # Ok(())
    /// # }
    /// ```
    pub fn validate(&self, anonymized: &Dataset, original: Option<&Dataset>) -> ValidationResult {
        let mut cache = ClassCache::new(anonymized);
        let mut checks = ValidationChecks::default();

        if self.thresholds.k_anonymity.enabled {
            let check = self.check_k_anonymity(&mut cache, original);
            log_check("k_anonymity", check.passed, &check.message);
            checks.k_anonymity = Some(check);
        }

        if self.thresholds.l_diversity.enabled {
            let check = self.check_l_diversity(&mut cache, anonymized);
            log_check("l_diversity", check.passed, &check.message);
            checks.l_diversity = Some(check);
        }

        if self.thresholds.reidentification_risk.enabled {
            let check = self.check_reidentification_risk(&mut cache);
            log_check("reidentification_risk", check.passed, &check.message);
            checks.reidentification_risk = Some(check);
        }

        let result = ValidationResult::from_checks(checks);
        tracing::info!(
            passed = result.passed,
            rows = anonymized.row_count(),
            "Privacy validation completed"
        );
        result
    }

    fn check_k_anonymity(
        &self,
        cache: &mut ClassCache<'_>,
        original: Option<&Dataset>,
    ) -> KAnonymityCheck {
        let config = &self.thresholds.k_anonymity;
        let required_k = config.minimum_k;
        let classes = cache.classes(&config.quasi_identifiers);
        let quasi_identifiers = classes.quasi_identifiers().to_vec();

        if quasi_identifiers.is_empty() {
            return KAnonymityCheck {
                passed: false,
                message: "No quasi-identifiers found in dataset".to_string(),
                min_k: 0,
                avg_k: 0.0,
                required_k,
                equivalence_classes: 0,
                quasi_identifiers,
                outlier_percent: None,
                baseline_min_k: None,
            };
        }

        let min_k = classes.min_size();
        let rows = classes.row_count();
        let mut passed = rows > 0 && min_k >= required_k;
        let mut outlier_percent = None;

        let message = if passed {
            format!("k-anonymity {min_k} meets threshold {required_k}")
        } else if config.allow_outliers && rows > 0 {
            let percent = percent_of(classes.rows_in_classes_below(required_k), rows);
            outlier_percent = Some(round2(percent));
            if percent <= config.max_outlier_percent {
                passed = true;
                format!(
                    "k-anonymity {min_k} below threshold {required_k}, but {percent:.1}% \
                     outliers acceptable (max: {:.1}%)",
                    config.max_outlier_percent
                )
            } else {
                format!(
                    "k-anonymity {min_k} below threshold {required_k}, {percent:.1}% \
                     outliers exceeds limit (max: {:.1}%)",
                    config.max_outlier_percent
                )
            }
        } else {
            format!("k-anonymity {min_k} below threshold {required_k}")
        };

        let baseline_min_k = original
            .map(|dataset| EquivalenceClasses::compute(dataset, &quasi_identifiers).min_size());

        KAnonymityCheck {
            passed,
            message,
            min_k,
            avg_k: classes.avg_size(),
            required_k,
            equivalence_classes: classes.len(),
            quasi_identifiers,
            outlier_percent,
            baseline_min_k,
        }
    }

    fn check_l_diversity(&self, cache: &mut ClassCache<'_>, dataset: &Dataset) -> LDiversityCheck {
        let config = &self.thresholds.l_diversity;
        let required_l = config.minimum_l;
        let sensitive: Vec<String> = config
            .sensitive_attributes
            .iter()
            .filter(|name| dataset.has_column(name))
            .cloned()
            .collect();

        let classes = cache.classes(self.thresholds.l_diversity_quasi_identifiers());
        let quasi_identifiers = classes.quasi_identifiers().to_vec();

        if sensitive.is_empty() {
            return LDiversityCheck {
                passed: true,
                message: "l-diversity not applicable: no sensitive attributes specified or found"
                    .to_string(),
                min_l: None,
                avg_l: None,
                required_l,
                sensitive_attributes: sensitive,
                quasi_identifiers,
            };
        }

        if quasi_identifiers.is_empty() {
            return LDiversityCheck {
                passed: false,
                message: "l-diversity missing prerequisite: no quasi-identifiers found".to_string(),
                min_l: Some(0),
                avg_l: Some(0.0),
                required_l,
                sensitive_attributes: sensitive,
                quasi_identifiers,
            };
        }

        let counts: Vec<usize> = sensitive
            .iter()
            .filter_map(|name| dataset.column(name))
            .flat_map(|column| classes.distinct_counts(column))
            .collect();

        let min_l = counts.iter().copied().min().unwrap_or(0);
        let avg_l = if counts.is_empty() {
            0.0
        } else {
            counts.iter().sum::<usize>() as f64 / counts.len() as f64
        };

        let passed = !counts.is_empty() && min_l >= required_l;
        let message = if passed {
            format!("l-diversity {min_l} meets threshold {required_l}")
        } else {
            format!("l-diversity {min_l} below threshold {required_l}")
        };

        LDiversityCheck {
            passed,
            message,
            min_l: Some(min_l),
            avg_l: Some(avg_l),
            required_l,
            sensitive_attributes: sensitive,
            quasi_identifiers,
        }
    }

    fn check_reidentification_risk(&self, cache: &mut ClassCache<'_>) -> ReidentificationRiskCheck {
        let max_risk_percent = self.thresholds.reidentification_risk.max_risk_percent;
        let classes = cache.classes(self.thresholds.risk_quasi_identifiers());
        let quasi_identifiers = classes.quasi_identifiers().to_vec();

        if quasi_identifiers.is_empty() {
            return ReidentificationRiskCheck {
                passed: false,
                message: "No quasi-identifiers found for risk assessment".to_string(),
                high_risk_count: 0,
                high_risk_percent: 0.0,
                medium_risk_count: 0,
                medium_risk_percent: 0.0,
                low_risk_count: 0,
                low_risk_percent: 0.0,
                max_risk_percent,
                quasi_identifiers,
            };
        }

        let (mut high, mut medium, mut low) = (0, 0, 0);
        for size in classes.sizes() {
            match *size {
                s if s <= HIGH_RISK_MAX_CLASS => high += s,
                s if s <= MEDIUM_RISK_MAX_CLASS => medium += s,
                s => low += s,
            }
        }

        let rows = classes.row_count();
        let high_risk_percent = percent_of(high, rows);
        let passed = high_risk_percent <= max_risk_percent;
        let message = if passed {
            format!(
                "Re-identification risk {high_risk_percent:.1}% below threshold {max_risk_percent:.1}%"
            )
        } else {
            format!(
                "Re-identification risk {high_risk_percent:.1}% exceeds threshold {max_risk_percent:.1}%"
            )
        };

        ReidentificationRiskCheck {
            passed,
            message,
            high_risk_count: high,
            high_risk_percent: round2(high_risk_percent),
            medium_risk_count: medium,
            medium_risk_percent: round2(percent_of(medium, rows)),
            low_risk_count: low,
            low_risk_percent: round2(percent_of(low, rows)),
            max_risk_percent,
            quasi_identifiers,
        }
    }
}

fn log_check(name: &str, passed: bool, message: &str) {
    if passed {
        tracing::info!(check = name, detail = message, "Privacy check passed");
    } else {
        tracing::warn!(check = name, detail = message, "Privacy check failed");
    }
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
