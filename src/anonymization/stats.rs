//! Run statistics for anonymization
//!
//! A fresh [`RunStatistics`] is produced by every anonymization call and
//! returned by value; nothing is accumulated across runs.

use serde::{Deserialize, Serialize};

/// Counters and error messages for one anonymization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Columns examined
    pub columns_processed: usize,

    /// Columns successfully transformed by a rule
    pub columns_anonymized: usize,

    /// Rows in the input dataset
    pub rows_processed: usize,

    /// One message per failed column
    pub errors: Vec<String>,
}

impl RunStatistics {
    /// Create empty statistics for a dataset with `rows` rows
    pub fn new(rows: usize) -> Self {
        Self {
            rows_processed: rows,
            ..Self::default()
        }
    }

    /// Record a column failure
    pub fn record_error(&mut self, column: &str, cause: impl std::fmt::Display) {
        self.errors
            .push(format!("Error anonymizing column '{column}': {cause}"));
    }

    /// Whether any column failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Format statistics for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                   ANONYMIZATION STATISTICS                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Columns Processed:   {}\n",
            self.columns_processed
        ));
        output.push_str(&format!(
            "  Columns Anonymized:  {}\n",
            self.columns_anonymized
        ));
        output.push_str(&format!("  Rows Processed:      {}\n", self.rows_processed));
        output.push('\n');

        if !self.errors.is_empty() {
            output.push_str("⚠️  ERRORS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for error in &self.errors {
                output.push_str(&format!("  • {error}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }
}
