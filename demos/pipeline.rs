//! Example demonstrating a full Veil pipeline
//!
//! This example shows how to:
//! - Build a rule set in code
//! - Anonymize a small patient dataset
//! - Certify the result with k-anonymity, l-diversity and risk checks
//!
//! Run with:
//! ```bash
//! cargo run --example pipeline
//! ```

use veil::anonymization::{
    Anonymizer, DateGranularity, GeneralizeParams, GlobalPolicy, HashAlgorithm, Locale, Rule,
    RuleSet, StrategyParams,
};
use veil::config::LoggingConfig;
use veil::domain::{Dataset, Value};
use veil::logging::init_logging;
use veil::privacy::{PrivacyThresholds, PrivacyValidator};

fn patients() -> veil::domain::Result<Dataset> {
    let names = ["Ada", "Grace", "Alan", "Edsger", "Barbara", "John"];
    let emails = names.map(|n| Value::from(format!("{}@example.com", n.to_lowercase())));
    Dataset::from_columns([
        ("name", names.map(Value::from).to_vec()),
        ("email", emails.to_vec()),
        (
            "age",
            [34, 36, 38, 52, 55, 58].map(Value::Int).to_vec(),
        ),
        (
            "admitted",
            [
                "2024-03-02", "2024-05-19", "2024-07-30", "2024-02-11", "2024-06-21", "2024-11-04",
            ]
            .map(Value::from)
            .to_vec(),
        ),
        (
            "diagnosis",
            ["flu", "asthma", "flu", "diabetes", "flu", "asthma"]
                .map(Value::from)
                .to_vec(),
        ),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep the guard alive for the duration of the program
    let _guard = init_logging("info", &LoggingConfig::default())?;

    let rules = RuleSet::new(
        [
            Rule::new(
                "name",
                StrategyParams::Pseudonymize {
                    seed_based: true,
                    locale: Locale::EnUs,
                    kind: None,
                },
            )?,
            Rule::new(
                "email",
                StrategyParams::Hash {
                    algorithm: HashAlgorithm::Sha256,
                    salt: true,
                },
            )?,
            Rule::new(
                "age",
                StrategyParams::Generalize {
                    family: GeneralizeParams::NumericBin {
                        bin_size: 20,
                        min_value: 20,
                        max_value: 79,
                    },
                },
            )?,
            Rule::new(
                "admitted",
                StrategyParams::Generalize {
                    family: GeneralizeParams::Granularity(DateGranularity::Year),
                },
            )?,
        ],
        GlobalPolicy::default(),
    )?;

    let original = patients()?;
    let anonymizer = Anonymizer::new(rules);
    let (anonymized, stats) = anonymizer.anonymize(&original, None)?;

    println!("{}", stats.format_console());
    println!(
        "{}",
        serde_json::to_string_pretty(&anonymized.to_json_records())?
    );

    let mut thresholds = PrivacyThresholds::default();
    thresholds.k_anonymity.enabled = true;
    thresholds.k_anonymity.minimum_k = 3;
    thresholds.k_anonymity.quasi_identifiers = vec!["age".into(), "admitted".into()];
    thresholds.l_diversity.enabled = true;
    thresholds.l_diversity.minimum_l = 2;
    thresholds.l_diversity.sensitive_attributes = vec!["diagnosis".into()];
    thresholds.reidentification_risk.enabled = true;
    thresholds.reidentification_risk.max_risk_percent = 5.0;

    let validator = PrivacyValidator::new(thresholds)?;
    let result = validator.validate(&anonymized, Some(&original));
    println!("{}", result.format_console());

    if result.passed {
        tracing::info!("Dataset certified");
    } else {
        tracing::warn!(summary = %result.summary, "Dataset did not pass certification");
    }

    Ok(())
}
