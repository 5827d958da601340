//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON file output with rotation
//! - `RUST_LOG` style filtering
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(columns = 4, "Anonymization started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Configuration("Invalid rule".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
