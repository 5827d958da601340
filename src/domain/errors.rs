//! Domain error types
//!
//! This module defines the error hierarchy for Veil. Privacy validation
//! failures are not errors: they are reported as data through
//! [`crate::privacy::ValidationResult`].

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Malformed or incomplete rule or threshold definitions
    ///
    /// Always fatal and always raised before any data is touched.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A value could not be processed by its assigned strategy
    #[error("Strategy error{}: {message}", column_suffix(.column))]
    Strategy {
        /// Column being anonymized, when known
        column: Option<String>,
        /// Cause of the failure
        message: String,
    },

    /// An optional backend is unavailable (e.g. the synthetic data generator)
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Structurally invalid dataset (ragged columns, unsupported cell types)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn column_suffix(column: &Option<String>) -> String {
    column
        .as_ref()
        .map(|c| format!(" in column '{c}'"))
        .unwrap_or_default()
}

impl VeilError {
    /// Creates a strategy error that is not yet attributed to a column
    pub fn strategy(message: impl Into<String>) -> Self {
        Self::Strategy {
            column: None,
            message: message.into(),
        }
    }

    /// Attaches a column name to a strategy error, leaving other variants untouched
    pub fn in_column(self, name: &str) -> Self {
        match self {
            Self::Strategy { message, .. } => Self::Strategy {
                column: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }

    /// Whether the error must abort a run regardless of the global policy
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Strategy { .. })
    }
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for VeilError {
    fn from(err: serde_yaml::Error) -> Self {
        VeilError::Configuration(format!("YAML parse error: {err}"))
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}
