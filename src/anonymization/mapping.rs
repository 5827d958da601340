//! Column to PII type mapping
//!
//! PII detection happens elsewhere; this module consumes its output. A
//! [`ScanReport`] lists candidate PII types per column with confidences and
//! [`ColumnMapping::from_scan`] keeps the most confident one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One PII type detected in a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiDetection {
    /// Detected PII type
    pub pii_type: String,

    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
}

/// Scanner output: candidate PII types per column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Detections keyed by column name
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<PiiDetection>>,
}

/// Assignment of PII types to columns
///
/// Columns without an entry are left untouched by the anonymizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, String>,
}

impl ColumnMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a PII type to a column, replacing any previous assignment
    pub fn insert(&mut self, column: impl Into<String>, pii_type: impl Into<String>) {
        self.entries.insert(column.into(), pii_type.into());
    }

    /// Builder-style [`ColumnMapping::insert`]
    pub fn with(mut self, column: impl Into<String>, pii_type: impl Into<String>) -> Self {
        self.insert(column, pii_type);
        self
    }

    /// PII type assigned to a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries.get(column).map(String::as_str)
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped `(column, pii_type)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    /// Builds a mapping from scanner output
    ///
    /// Keeps the highest-confidence type per column; on ties the first listed
    /// detection wins. Columns with no detections are skipped.
    pub fn from_scan(report: &ScanReport) -> Self {
        let entries = report
            .columns
            .iter()
            .filter_map(|(column, detections)| {
                let best = detections.iter().fold(None::<&PiiDetection>, |best, d| match best {
                    Some(b) if b.confidence >= d.confidence => Some(b),
                    _ => Some(d),
                })?;
                Some((column.clone(), best.pii_type.clone()))
            })
            .collect();
        Self { entries }
    }
}

impl<C: Into<String>, P: Into<String>> FromIterator<(C, P)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (C, P)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(c, p)| (c.into(), p.into()))
                .collect(),
        }
    }
}
