//! Anonymization module for Veil
//!
//! This module turns tabular datasets containing PII into privacy-protected
//! datasets according to a declarative rule set.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Rules**: One validated [`Rule`] per PII type, grouped in a [`RuleSet`]
//! - **Strategies**: Hash, full/partial redaction, pseudonymization and
//!   generalization over single values ([`strategy`])
//! - **Orchestration**: The [`Anonymizer`] applies rules column by column and
//!   reports [`RunStatistics`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use veil::anonymization::{Anonymizer, RuleSet};
//!
//! let rules = RuleSet::from_config(&config.rules, config.global.clone())?;
//! let anonymizer = Anonymizer::new(rules);
//! let (anonymized, stats) = anonymizer.anonymize(&dataset, Some(&mapping))?;
//! ```

pub mod engine;
pub mod mapping;
pub mod rule_set;
pub mod rules;
pub mod stats;
pub mod strategy;
pub mod synthetic;

// Re-export main types
pub use engine::Anonymizer;
pub use mapping::{ColumnMapping, PiiDetection, ScanReport};
pub use rule_set::{GlobalPolicy, RuleSet};
pub use rules::{
    AddressLevel, DateGranularity, GeneralizeParams, HashAlgorithm, RawRule, Rule, Strategy,
    StrategyParams,
};
pub use stats::RunStatistics;
pub use strategy::Pseudonymizer;
pub use synthetic::{Locale, SemanticKind};
