//! Privacy validation for anonymized datasets
//!
//! Provides syntactic privacy certification:
//! - **k-anonymity**: every row shares its quasi-identifiers with at least k-1 others
//! - **l-diversity**: every equivalence class holds at least l distinct sensitive values
//! - **Re-identification risk**: share of rows in very small equivalence classes
//!
//! A failed check is reported through [`ValidationResult`], never as an error.

pub mod equivalence;
pub mod report;
pub mod thresholds;
pub mod validator;

pub use equivalence::EquivalenceClasses;
pub use report::{
    KAnonymityCheck, LDiversityCheck, ReidentificationRiskCheck, ValidationChecks,
    ValidationResult,
};
pub use thresholds::{
    KAnonymityConfig, LDiversityConfig, PrivacyThresholds, ReidentificationRiskConfig,
};
pub use validator::PrivacyValidator;
