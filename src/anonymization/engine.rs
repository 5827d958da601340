//! Anonymization orchestrator
//!
//! This module provides the [`Anonymizer`] that applies a [`RuleSet`] to an
//! entire [`Dataset`], column by column.
//!
//! # Behavior
//!
//! For every column the PII type is resolved (from the explicit mapping when
//! one is given, otherwise from the column name), the matching rule's strategy
//! is applied to each value, and numeric types are restored where the policy
//! allows it. Columns without a rule are copied verbatim.
//!
//! # Examples
//!
//! ```
//! use veil::anonymization::{
//!     Anonymizer, ColumnMapping, GlobalPolicy, Rule, RuleSet, StrategyParams,
//! };
//! use veil::domain::{Dataset, Value};
//!
//! # fn example() -> veil::domain::Result<()> {
//! let rules = RuleSet::new(
//!     [Rule::new("ssn", StrategyParams::RedactFull { replacement: "[REDACTED]".into() })?],
//!     GlobalPolicy::default(),
//! )?;
//! let anonymizer = Anonymizer::new(rules);
//!
//! let dataset = Dataset::from_columns([("national_id", vec![Value::from("123-45-6789")])])?;
//! let mapping = ColumnMapping::new().with("national_id", "ssn");
//!
//! let (output, stats) = anonymizer.anonymize(&dataset, Some(&mapping))?;
//! assert_eq!(output.column("national_id").unwrap().values()[0], Value::from("[REDACTED]"));
//! assert_eq!(stats.columns_anonymized, 1);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::mapping::ColumnMapping;
use crate::anonymization::rule_set::RuleSet;
use crate::anonymization::rules::Rule;
use crate::anonymization::stats::RunStatistics;
use crate::anonymization::strategy::{self, Pseudonymizer};
use crate::domain::{Column, ColumnType, Dataset, Result, Value};
use std::sync::Arc;
use std::time::Instant;

/// Applies anonymization rules to datasets
///
/// # Thread Safety
///
/// The anonymizer is `Send + Sync` and can be shared behind an `Arc`. The
/// pseudonym cache it holds is internally synchronized and survives across
/// calls, so several anonymizers may share one [`Pseudonymizer`] to keep
/// pseudonyms consistent between datasets.
#[derive(Debug)]
pub struct Anonymizer {
    rules: RuleSet,
    pseudonymizer: Arc<Pseudonymizer>,
}

impl Anonymizer {
    /// Create an anonymizer with its own pseudonym cache
    ///
    /// The cache is bounded by the rule set's
    /// `global.pseudonym_cache_capacity`.
    pub fn new(rules: RuleSet) -> Self {
        let capacity = rules.global().pseudonym_cache_capacity;
        Self::with_pseudonymizer(rules, Arc::new(Pseudonymizer::new(capacity)))
    }

    /// Create an anonymizer that uses a shared pseudonymizer
    pub fn with_pseudonymizer(rules: RuleSet, pseudonymizer: Arc<Pseudonymizer>) -> Self {
        Self {
            rules,
            pseudonymizer,
        }
    }

    /// Rules applied by this anonymizer
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Pseudonym cache used by this anonymizer
    pub fn pseudonymizer(&self) -> &Arc<Pseudonymizer> {
        &self.pseudonymizer
    }

    /// Anonymize a dataset
    ///
    /// The input is never modified; a new dataset and fresh statistics are
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Dataset to anonymize
    /// * `mapping` - Optional column to PII type mapping. A non-empty mapping
    ///   is the only source of PII types; when it is absent or empty, column
    ///   names are matched against rule PII types.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A column fails and `global.handle_nulls` is false
    /// - The synthetic data backend is unavailable (always fatal)
    pub fn anonymize(
        &self,
        dataset: &Dataset,
        mapping: Option<&ColumnMapping>,
    ) -> Result<(Dataset, RunStatistics)> {
        let start = Instant::now();
        let policy = self.rules.global();
        let mut stats = RunStatistics::new(dataset.row_count());
        let mut columns = Vec::with_capacity(dataset.column_count());

        tracing::info!(
            columns = dataset.column_count(),
            rows = dataset.row_count(),
            rules = self.rules.len(),
            explicit_mapping = mapping.is_some(),
            "Starting anonymization"
        );

        for column in dataset.columns() {
            stats.columns_processed += 1;

            let Some(rule) = self.resolve_rule(column.name(), mapping) else {
                tracing::debug!(column = column.name(), "No rule for column, copying");
                columns.push(column.clone());
                continue;
            };

            tracing::debug!(
                column = column.name(),
                pii_type = rule.pii_type(),
                strategy = %rule.strategy(),
                "Anonymizing column"
            );

            match self.transform_column(column, rule) {
                Ok(values) => {
                    stats.columns_anonymized += 1;
                    columns.push(Column::new(column.name(), values));
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(column = column.name(), error = %err, "Anonymization aborted");
                    return Err(err);
                }
                Err(err) => {
                    stats.record_error(column.name(), &err);
                    tracing::warn!(
                        column = column.name(),
                        error = %err,
                        "Failed to anonymize column"
                    );
                    if !policy.handle_nulls {
                        return Err(err.in_column(column.name()));
                    }
                    columns.push(column.clone());
                }
            }
        }

        let output = Dataset::new(columns)?;

        tracing::info!(
            columns_processed = stats.columns_processed,
            columns_anonymized = stats.columns_anonymized,
            errors = stats.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Anonymization completed"
        );

        Ok((output, stats))
    }

    fn resolve_rule(&self, column: &str, mapping: Option<&ColumnMapping>) -> Option<&Rule> {
        match mapping {
            Some(mapping) if !mapping.is_empty() => {
                mapping.get(column).and_then(|pii| self.rules.get(pii))
            }
            _ => self.rules.get(column),
        }
    }

    /// Transforms every value of a column; the first failure aborts the column
    fn transform_column(&self, column: &Column, rule: &Rule) -> Result<Vec<Value>> {
        let values = column
            .values()
            .iter()
            .map(|value| strategy::apply(value, rule, &self.pseudonymizer))
            .collect::<Result<Vec<_>>>()?;

        if self.rules.global().preserve_data_types && !rule.strategy().is_textual() {
            return Ok(restore_numeric_type(column.dtype(), values));
        }
        Ok(values)
    }
}

/// Reparses textual output into the column's numeric type
///
/// Conversion happens only if every non-null value parses cleanly; otherwise
/// the values are returned as they are.
fn restore_numeric_type(dtype: ColumnType, values: Vec<Value>) -> Vec<Value> {
    let parse: fn(&str) -> Option<Value> = match dtype {
        ColumnType::Integer => |s| s.parse::<i64>().ok().map(Value::Int),
        ColumnType::Float => |s| s.parse::<f64>().ok().map(Value::Float),
        ColumnType::Text | ColumnType::Empty => return values,
    };

    let converted: Option<Vec<Value>> = values
        .iter()
        .map(|value| match value {
            Value::Text(s) => parse(s),
            other => Some(other.clone()),
        })
        .collect();

    converted.unwrap_or(values)
}
