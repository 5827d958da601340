//! Integration tests for the anonymization pipeline with synthetic customer data
//!
//! The rule set includes a pseudonymize rule, so these tests need the
//! synthetic data backend.

#![cfg(feature = "synthetic")]

use std::sync::Arc;
use veil::anonymization::{
    Anonymizer, ColumnMapping, GlobalPolicy, HashAlgorithm, Pseudonymizer, RawRule, RuleSet,
};
use veil::domain::{Dataset, Value, VeilError};

/// Rules covering every strategy family, in configuration form
fn customer_rules_yaml() -> &'static str {
    r#"
email:
  strategy: hash
  parameters:
    algorithm: sha256
    salt: true
phone:
  strategy: redact_partial
  parameters:
    visible_chars: 4
    mask_char: "*"
ssn:
  strategy: redact_full
name:
  strategy: pseudonymize
  parameters:
    seed_based: true
    locale: en_US
age:
  strategy: generalize
  parameters:
    bin_size: 10
    min_value: 0
    max_value: 100
date_of_birth:
  strategy: generalize
  parameters:
    granularity: year
address:
  strategy: generalize
  parameters:
    level: city
ip_address:
  strategy: generalize
  parameters:
    octets: 3
zip_code:
  strategy: generalize
  parameters:
    precision: 3
"#
}

fn customer_rules(global: GlobalPolicy) -> RuleSet {
    let raw: std::collections::BTreeMap<String, RawRule> =
        serde_yaml::from_str(customer_rules_yaml()).unwrap();
    RuleSet::from_config(&raw, global).unwrap()
}

/// Create a synthetic customer dataset with PII in every column but one
fn customer_dataset() -> Dataset {
    Dataset::from_columns([
        ("customer_id", vec![Value::Int(1001), Value::Int(1002), Value::Int(1003)]),
        (
            "name",
            vec![Value::from("John Doe"), Value::from("Jane Roe"), Value::from("John Doe")],
        ),
        (
            "email",
            vec![
                Value::from("john@example.com"),
                Value::from("jane@example.com"),
                Value::Null,
            ],
        ),
        (
            "phone",
            vec![
                Value::from("555-123-4567"),
                Value::from("555-987-6543"),
                Value::from("555-000-1111"),
            ],
        ),
        (
            "ssn",
            vec![
                Value::from("123-45-6789"),
                Value::from("987-65-4321"),
                Value::from("111-22-3333"),
            ],
        ),
        ("age", vec![Value::Int(34), Value::Int(150), Value::Float(9.5)]),
        (
            "date_of_birth",
            vec![
                Value::from("1985-06-15"),
                Value::from("1990-01-01T08:30:00Z"),
                Value::from("not a date"),
            ],
        ),
        (
            "address",
            vec![
                Value::from("123 Main St, Springfield, IL, USA"),
                Value::from("9 Elm Rd, Portland, OR, USA"),
                Value::Null,
            ],
        ),
        (
            "ip_address",
            vec![
                Value::from("192.168.1.42"),
                Value::from("10.0.0.7"),
                Value::from("172.16.5.9"),
            ],
        ),
        (
            "zip_code",
            vec![Value::from("94105"), Value::from("10001"), Value::from("60614")],
        ),
    ])
    .unwrap()
}

fn text_at(dataset: &Dataset, column: &str, row: usize) -> String {
    dataset.column(column).unwrap().values()[row]
        .as_text()
        .unwrap()
        .to_string()
}

#[test]
fn test_end_to_end_anonymization() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let input = customer_dataset();

    let (output, stats) = anonymizer.anonymize(&input, None).unwrap();

    assert_eq!(stats.columns_processed, 10);
    assert_eq!(stats.columns_anonymized, 9);
    assert_eq!(stats.rows_processed, 3);
    assert!(!stats.has_errors());

    // Unmapped column copied verbatim
    assert_eq!(output.column("customer_id"), input.column("customer_id"));

    let email = text_at(&output, "email", 0);
    assert_eq!(email.len(), 64);
    assert!(email.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(output.column("email").unwrap().values()[2], Value::Null);

    assert_eq!(text_at(&output, "phone", 0), "********4567");
    assert_eq!(text_at(&output, "ssn", 1), "[REDACTED]");

    assert_eq!(text_at(&output, "age", 0), "30-39");
    assert_eq!(text_at(&output, "age", 1), "91-100");
    assert_eq!(text_at(&output, "age", 2), "0-9");

    assert_eq!(text_at(&output, "date_of_birth", 0), "1985");
    assert_eq!(text_at(&output, "date_of_birth", 1), "1990");
    assert_eq!(text_at(&output, "date_of_birth", 2), "not a date");

    assert_eq!(text_at(&output, "address", 0), "Springfield, IL, USA");
    assert_eq!(output.column("address").unwrap().values()[2], Value::Null);

    assert_eq!(text_at(&output, "ip_address", 0), "192.168.1.0");
    assert_eq!(text_at(&output, "zip_code", 1), "100**");
}

#[test]
fn test_input_dataset_is_not_mutated() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let input = customer_dataset();
    let snapshot = input.clone();

    let _ = anonymizer.anonymize(&input, None).unwrap();

    assert_eq!(input, snapshot);
}

#[test]
fn test_seeded_pseudonyms_are_consistent() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let (output, _) = anonymizer.anonymize(&customer_dataset(), None).unwrap();

    let first = text_at(&output, "name", 0);
    let second = text_at(&output, "name", 1);
    let repeat = text_at(&output, "name", 2);

    assert_ne!(first, "John Doe");
    assert_eq!(first, repeat);
    assert_ne!(first, second);

    // A fresh anonymizer with an empty cache derives the same pseudonym
    let fresh = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let (again, _) = fresh.anonymize(&customer_dataset(), None).unwrap();
    assert_eq!(text_at(&again, "name", 0), first);
}

#[test]
fn test_deterministic_rerun() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let input = customer_dataset();

    let (first, _) = anonymizer.anonymize(&input, None).unwrap();
    let (second, _) = anonymizer.anonymize(&input, None).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_shared_pseudonymizer_across_datasets() {
    let shared = Arc::new(Pseudonymizer::new(128));
    let rules = || customer_rules(GlobalPolicy::default());
    let crm = Anonymizer::with_pseudonymizer(rules(), Arc::clone(&shared));
    let billing = Anonymizer::with_pseudonymizer(rules(), Arc::clone(&shared));

    let crm_data = Dataset::from_columns([("name", vec![Value::from("Ada Lovelace")])]).unwrap();
    let billing_data = Dataset::from_columns([(
        "name",
        vec![Value::from("Charles Babbage"), Value::from("Ada Lovelace")],
    )])
    .unwrap();

    let (crm_out, _) = crm.anonymize(&crm_data, None).unwrap();
    let (billing_out, _) = billing.anonymize(&billing_data, None).unwrap();

    assert_eq!(text_at(&crm_out, "name", 0), text_at(&billing_out, "name", 1));
    assert_eq!(shared.len(), 2);
}

#[test]
fn test_explicit_mapping_overrides_column_names() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let input = Dataset::from_columns([
        ("contact", vec![Value::from("john@example.com")]),
        ("ssn", vec![Value::from("123-45-6789")]),
    ])
    .unwrap();

    // Only mapped columns are considered once a mapping is given
    let mapping = ColumnMapping::new().with("contact", "EMAIL");
    let (output, stats) = anonymizer.anonymize(&input, Some(&mapping)).unwrap();

    assert_eq!(stats.columns_anonymized, 1);
    assert_eq!(text_at(&output, "contact", 0).len(), 64);
    assert_eq!(text_at(&output, "ssn", 0), "123-45-6789");
}

#[test]
fn test_case_sensitive_matching_skips_other_case() {
    let global = GlobalPolicy {
        case_sensitive: true,
        ..GlobalPolicy::default()
    };
    let anonymizer = Anonymizer::new(customer_rules(global));
    let input = Dataset::from_columns([("SSN", vec![Value::from("123-45-6789")])]).unwrap();

    let (output, stats) = anonymizer.anonymize(&input, None).unwrap();

    assert_eq!(stats.columns_anonymized, 0);
    assert_eq!(output, input);
}

#[test]
fn test_failed_column_is_copied_and_reported() {
    let anonymizer = Anonymizer::new(customer_rules(GlobalPolicy::default()));
    let input = Dataset::from_columns([
        ("age", vec![Value::Int(34), Value::from("unknown")]),
        ("ssn", vec![Value::from("123-45-6789"), Value::Null]),
    ])
    .unwrap();

    let (output, stats) = anonymizer.anonymize(&input, None).unwrap();

    assert_eq!(stats.columns_anonymized, 1);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("'age'"));
    assert_eq!(output.column("age"), input.column("age"));
    assert_eq!(text_at(&output, "ssn", 0), "[REDACTED]");
}

#[test]
fn test_failed_column_aborts_without_null_handling() {
    let global = GlobalPolicy {
        handle_nulls: false,
        ..GlobalPolicy::default()
    };
    let anonymizer = Anonymizer::new(customer_rules(global));
    let input = Dataset::from_columns([("ip_address", vec![Value::from("::1")])]).unwrap();

    let err = anonymizer.anonymize(&input, None).unwrap_err();

    match err {
        VeilError::Strategy { column, .. } => assert_eq!(column.as_deref(), Some("ip_address")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_hash_algorithms_differ_in_length() {
    let input = Dataset::from_columns([("email", vec![Value::from("john@example.com")])]).unwrap();

    for (algorithm, len) in [
        (HashAlgorithm::Sha256, 64),
        (HashAlgorithm::Sha512, 128),
        (HashAlgorithm::Md5, 32),
    ] {
        let rule = veil::anonymization::Rule::new(
            "email",
            veil::anonymization::StrategyParams::Hash {
                algorithm,
                salt: false,
            },
        )
        .unwrap();
        let rules = RuleSet::new([rule], GlobalPolicy::default()).unwrap();
        let (output, _) = Anonymizer::new(rules).anonymize(&input, None).unwrap();
        assert_eq!(text_at(&output, "email", 0).len(), len, "{algorithm:?}");
    }
}
