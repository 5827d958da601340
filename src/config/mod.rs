//! Configuration management for Veil.
//!
//! This module loads, parses and validates rule files.
//!
//! # Overview
//!
//! Veil reads YAML (default) or TOML rule files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment overrides for global flags and logging
//! - Default values for optional settings
//! - Validation of every rule before any data is touched
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.yaml")?;
//! let rules = config.rule_set()?;
//! println!("{} rules loaded", rules.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```yaml
//! version: "1.0"
//! rules:
//!   email:
//!     strategy: hash
//!     parameters:
//!       algorithm: sha256
//!       salt: true
//!   name:
//!     strategy: pseudonymize
//!     parameters:
//!       seed_based: true
//!       locale: en_US
//! global:
//!   handle_nulls: true
//!   case_sensitive: false
//! privacy_thresholds:
//!   k_anonymity:
//!     enabled: true
//!     minimum_k: 5
//!     quasi_identifiers: [age, zip_code]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{LogRotation, LoggingConfig, VeilConfig};
