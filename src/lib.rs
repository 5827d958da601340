// Veil - Rule-driven anonymization with privacy certification
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Rule-driven tabular anonymization
//!
//! Veil turns tabular datasets containing personally identifiable information
//! into privacy-protected datasets and certifies the result.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Declaring** one anonymization rule per PII type, validated on load
//! - **Transforming** values with hashing, redaction, pseudonymization and
//!   generalization
//! - **Orchestrating** rules across the columns of a dataset
//! - **Certifying** output against k-anonymity, l-diversity and
//!   re-identification risk thresholds
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Rule model, strategy engine and orchestrator
//! - [`privacy`] - Privacy validator and reports
//! - [`domain`] - Tabular data types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::anonymization::Anonymizer;
//! use veil::config::load_config;
//! use veil::domain::{Dataset, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.yaml")?;
//!     let anonymizer = Anonymizer::new(config.rule_set()?);
//!
//!     let dataset = Dataset::from_columns([
//!         ("email", vec![Value::from("ann@example.com")]),
//!         ("age", vec![Value::Int(34)]),
//!     ])?;
//!     let (anonymized, stats) = anonymizer.anonymize(&dataset, None)?;
//!
//!     let result = config.privacy_validator()?.validate(&anonymized, Some(&dataset));
//!     println!("{}", stats.format_console());
//!     println!("{}", result.format_console());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Veil uses the [`domain::VeilError`] type for all library errors. A privacy
//! check that does not pass is not an error: it is reported through
//! [`privacy::ValidationResult::passed`].
//!
//! ```rust,no_run
//! use veil::domain::VeilError;
//!
//! fn example() -> Result<(), VeilError> {
//!     let config = veil::config::load_config("veil.yaml")?;
//!     let _rules = config.rule_set()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Veil emits structured events with the `tracing` crate. Original values are
//! never logged, only column names, PII types and counts.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod privacy;
