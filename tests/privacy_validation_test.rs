//! Integration tests for privacy validation of anonymized datasets

use veil::anonymization::{
    Anonymizer, GeneralizeParams, GlobalPolicy, Rule, RuleSet, StrategyParams,
};
use veil::domain::{Dataset, Value};
use veil::privacy::{EquivalenceClasses, PrivacyThresholds, PrivacyValidator};

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn k_thresholds(minimum_k: usize, quasi_identifiers: &[&str]) -> PrivacyThresholds {
    let mut thresholds = PrivacyThresholds::default();
    thresholds.k_anonymity.enabled = true;
    thresholds.k_anonymity.minimum_k = minimum_k;
    thresholds.k_anonymity.quasi_identifiers = strings(quasi_identifiers);
    thresholds
}

/// Patients with exact ages and five-digit zip codes
fn patients() -> Dataset {
    let ages = [31, 33, 35, 38, 39, 42, 44, 47, 49, 56];
    let zips = [
        "94105", "94107", "94110", "94112", "94117", "94121", "94122", "94131", "94133", "94143",
    ];
    let diagnoses = [
        "flu", "asthma", "flu", "diabetes", "asthma", "flu", "diabetes", "flu", "asthma", "flu",
    ];
    Dataset::from_columns([
        ("age", ages.iter().map(|a| Value::Int(*a)).collect::<Vec<_>>()),
        ("zip_code", zips.iter().map(|z| Value::from(*z)).collect()),
        ("diagnosis", diagnoses.iter().map(|d| Value::from(*d)).collect()),
    ])
    .unwrap()
}

fn generalizing_anonymizer() -> Anonymizer {
    let rules = RuleSet::new(
        [
            Rule::new(
                "age",
                StrategyParams::Generalize {
                    family: GeneralizeParams::NumericBin {
                        bin_size: 20,
                        min_value: 20,
                        max_value: 79,
                    },
                },
            )
            .unwrap(),
            Rule::new(
                "zip_code",
                StrategyParams::Generalize {
                    family: GeneralizeParams::Precision { precision: 3 },
                },
            )
            .unwrap(),
        ],
        GlobalPolicy::default(),
    )
    .unwrap();
    Anonymizer::new(rules)
}

#[test]
fn test_raw_data_fails_and_generalized_data_passes() {
    let original = patients();
    let validator = PrivacyValidator::new(k_thresholds(5, &["age", "zip_code"])).unwrap();

    let raw = validator.validate(&original, None);
    assert!(!raw.passed);
    assert_eq!(raw.checks.k_anonymity.as_ref().unwrap().min_k, 1);

    let (anonymized, _) = generalizing_anonymizer().anonymize(&original, None).unwrap();
    let result = validator.validate(&anonymized, Some(&original));

    // 20-39 and 40-59 bins of five rows each, all under 941**
    let check = result.checks.k_anonymity.as_ref().unwrap();
    assert!(result.passed, "{}", check.message);
    assert_eq!(check.min_k, 5);
    assert_eq!(check.equivalence_classes, 2);
    assert_eq!(check.baseline_min_k, Some(1));
    assert_eq!(result.summary, "All privacy checks passed");
}

#[test]
fn test_singleton_class_gives_min_k_one() {
    let dataset = Dataset::from_columns([
        ("age", vec![Value::Int(30), Value::Int(30), Value::Int(31)]),
        ("zip", vec![Value::from("100"), Value::from("100"), Value::from("100")]),
    ])
    .unwrap();

    let classes = EquivalenceClasses::compute(&dataset, &strings(&["age", "zip"]));
    assert_eq!(classes.min_size(), 1);
    assert_eq!(classes.len(), 2);

    let result = PrivacyValidator::new(k_thresholds(2, &["age", "zip"]))
        .unwrap()
        .validate(&dataset, None);
    assert!(!result.passed);
    assert_eq!(result.summary, "Privacy validation failed: k_anonymity");
}

#[test]
fn test_outliers_within_tolerance_pass() {
    // 97 rows in one class and three unique rows: 3% outliers
    let mut zips: Vec<Value> = vec![Value::from("941**"); 97];
    zips.extend(["100**", "606**", "021**"].map(Value::from));
    let dataset = Dataset::from_columns([("zip", zips)]).unwrap();

    let mut thresholds = k_thresholds(5, &["zip"]);
    thresholds.k_anonymity.allow_outliers = true;
    thresholds.k_anonymity.max_outlier_percent = 5.0;

    let result = PrivacyValidator::new(thresholds.clone()).unwrap().validate(&dataset, None);
    let check = result.checks.k_anonymity.as_ref().unwrap();
    assert!(check.passed);
    assert_eq!(check.outlier_percent, Some(3.0));
    assert!(check.message.contains("3.0%"), "{}", check.message);

    thresholds.k_anonymity.max_outlier_percent = 2.0;
    let result = PrivacyValidator::new(thresholds).unwrap().validate(&dataset, None);
    assert!(!result.passed);
}

#[test]
fn test_l_diversity_on_generalized_data() {
    let original = patients();
    let (anonymized, _) = generalizing_anonymizer().anonymize(&original, None).unwrap();

    let mut thresholds = k_thresholds(5, &["age", "zip_code"]);
    thresholds.l_diversity.enabled = true;
    thresholds.l_diversity.minimum_l = 3;
    thresholds.l_diversity.sensitive_attributes = strings(&["diagnosis"]);

    let result = PrivacyValidator::new(thresholds.clone())
        .unwrap()
        .validate(&anonymized, None);
    let check = result.checks.l_diversity.as_ref().unwrap();

    // 20-39: flu, asthma, diabetes; 40-59: asthma, flu, diabetes
    assert!(check.passed, "{}", check.message);
    assert_eq!(check.min_l, Some(3));
    assert_eq!(check.quasi_identifiers, strings(&["age", "zip_code"]));

    thresholds.l_diversity.minimum_l = 4;
    let result = PrivacyValidator::new(thresholds).unwrap().validate(&anonymized, None);
    assert!(!result.passed);
    assert_eq!(result.summary, "Privacy validation failed: l_diversity");
}

#[test]
fn test_reidentification_risk_reuses_quasi_identifiers() {
    let original = patients();
    let mut thresholds = PrivacyThresholds::default();
    thresholds.k_anonymity.quasi_identifiers = strings(&["age", "zip_code"]);
    thresholds.reidentification_risk.enabled = true;
    thresholds.reidentification_risk.max_risk_percent = 5.0;
    let validator = PrivacyValidator::new(thresholds).unwrap();

    let raw = validator.validate(&original, None);
    let raw_risk = raw.checks.reidentification_risk.as_ref().unwrap();
    assert!(!raw.passed);
    assert_eq!(raw_risk.high_risk_count, 10);
    assert_eq!(raw_risk.high_risk_percent, 100.0);

    let (anonymized, _) = generalizing_anonymizer().anonymize(&original, None).unwrap();
    let result = validator.validate(&anonymized, None);
    let risk = result.checks.reidentification_risk.as_ref().unwrap();
    assert!(result.passed);
    assert_eq!(risk.high_risk_count, 0);
    assert_eq!(risk.low_risk_count, 10);
    assert!(result.checks.k_anonymity.is_none());
}

#[test]
fn test_all_checks_together_report_every_failure() {
    let dataset = patients();
    let mut thresholds = k_thresholds(2, &["age"]);
    thresholds.l_diversity.enabled = true;
    thresholds.l_diversity.sensitive_attributes = strings(&["diagnosis"]);
    thresholds.reidentification_risk.enabled = true;

    let result = PrivacyValidator::new(thresholds).unwrap().validate(&dataset, None);

    assert!(!result.passed);
    assert_eq!(
        result.summary,
        "Privacy validation failed: k_anonymity, l_diversity, reidentification_risk"
    );
}

#[test]
fn test_result_serializes_with_stable_field_names() {
    let dataset = patients();
    let result = PrivacyValidator::new(k_thresholds(2, &["zip_code"]))
        .unwrap()
        .validate(&dataset, None);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["checks"]["k_anonymity"]["min_k"], 1);
    assert_eq!(json["checks"]["k_anonymity"]["required_k"], 2);
    assert!(json["checks"].get("l_diversity").is_none());
    assert!(json["summary"].as_str().unwrap().contains("k_anonymity"));
}

#[test]
fn test_console_report_lists_checks() {
    let dataset = patients();
    let result = PrivacyValidator::new(k_thresholds(2, &["zip_code"]))
        .unwrap()
        .validate(&dataset, None);

    let report = result.format_console();
    assert!(report.contains("PRIVACY VALIDATION REPORT"));
    assert!(report.contains("k-anonymity 1 below threshold 2"));
}
