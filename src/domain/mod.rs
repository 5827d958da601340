//! Domain models and types for Veil.
//!
//! The domain layer provides:
//! - **Tabular data** ([`Dataset`], [`Column`], [`Value`], [`ColumnType`])
//! - **Error types** ([`VeilError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use veil::domain::{Dataset, Value};
//!
//! # fn example() -> veil::domain::Result<()> {
//! let dataset = Dataset::from_columns([
//!     ("email", vec![Value::from("ann@example.com"), Value::Null]),
//!     ("age", vec![Value::Int(34), Value::Int(51)]),
//! ])?;
//! assert_eq!(dataset.row_count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod errors;
pub mod result;
pub mod value;

pub use dataset::{Column, ColumnType, Dataset};
pub use errors::VeilError;
pub use result::Result;
pub use value::Value;
