//! CLI command implementations
//!
//! Datasets are read and written as JSON arrays of records.

pub mod anonymize;
pub mod check;
pub mod init;
pub mod validate;

use crate::domain::{Dataset, VeilError};
use anyhow::Context;
use std::fs;

/// Reads a dataset from a JSON records file
pub(crate) fn read_dataset(path: &str) -> anyhow::Result<Dataset> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read dataset {path}"))?;
    let records: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse dataset {path} as JSON"))?;
    Dataset::from_json_records(&records).with_context(|| format!("Invalid dataset {path}"))
}

/// Writes a dataset as pretty-printed JSON records
pub(crate) fn write_dataset(path: &str, dataset: &Dataset) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(&dataset.to_json_records())?;
    fs::write(path, rendered).with_context(|| format!("Failed to write dataset {path}"))
}

/// Process exit code for a library error
pub(crate) fn exit_code_for(err: &VeilError) -> i32 {
    match err {
        VeilError::Configuration(_) => 2,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;

    #[test]
    fn test_dataset_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let path = path.to_str().unwrap();

        let dataset = Dataset::from_columns([
            ("name", vec![Value::from("Ada"), Value::Null]),
            ("age", vec![Value::Int(36), Value::Int(41)]),
        ])
        .unwrap();
        write_dataset(path, &dataset).unwrap();

        let read = read_dataset(path).unwrap();
        assert_eq!(read, dataset);
    }

    #[test]
    fn test_read_dataset_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"name": "Ada"}"#).unwrap();
        assert!(read_dataset(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&VeilError::Configuration("x".into())), 2);
        assert_eq!(exit_code_for(&VeilError::Dependency("x".into())), 5);
        assert_eq!(exit_code_for(&VeilError::strategy("x")), 5);
    }
}
