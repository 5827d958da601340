//! Tabular dataset model
//!
//! A [`Dataset`] is an ordered sequence of named [`Column`]s that all share
//! the same number of rows. Anonymization never mutates a dataset in place;
//! it always builds a new one.

use super::errors::VeilError;
use super::result::Result;
use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Logical type of a column, derived from its non-null values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every non-null value is an integer
    Integer,
    /// Every non-null value is numeric and at least one is a float
    Float,
    /// At least one non-null value is text
    Text,
    /// The column holds no non-null values
    Empty,
}

impl ColumnType {
    /// Whether the type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// A named column of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a new column
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Logical type of the column
    pub fn dtype(&self) -> ColumnType {
        let mut seen_float = false;
        let mut seen_any = false;

        for value in &self.values {
            match value {
                Value::Null => continue,
                Value::Text(_) => return ColumnType::Text,
                Value::Float(_) => seen_float = true,
                Value::Int(_) => {}
            }
            seen_any = true;
        }

        match (seen_any, seen_float) {
            (false, _) => ColumnType::Empty,
            (true, true) => ColumnType::Float,
            (true, false) => ColumnType::Integer,
        }
    }
}

/// An in-memory table
///
/// Deserialization goes through [`Dataset::new`], so the same column checks
/// apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = VeilError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Self::new(raw.columns)
    }
}

impl Dataset {
    /// Creates a dataset from columns
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Dataset`] if column names repeat or columns have
    /// different lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(VeilError::Dataset(format!(
                    "Duplicate column name: {}",
                    column.name()
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(ragged) = columns.iter().find(|c| c.len() != expected) {
                return Err(VeilError::Dataset(format!(
                    "Column '{}' has {} rows, expected {}",
                    ragged.name(),
                    ragged.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Convenience constructor from `(name, values)` pairs
    pub fn from_columns<N, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Value>)>,
    {
        Self::new(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Builds a dataset from a JSON array of row objects
    ///
    /// Column order follows first appearance across rows. Keys missing from a
    /// row are read as null. Booleans are read as text.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Dataset`] if the input is not an array of objects
    /// or a cell holds a nested array/object.
    pub fn from_json_records(records: &serde_json::Value) -> Result<Self> {
        let rows = records
            .as_array()
            .ok_or_else(|| VeilError::Dataset("Expected a JSON array of records".to_string()))?;

        let mut names: Vec<String> = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| {
                VeilError::Dataset(format!("Record {idx} is not a JSON object"))
            })?;
            for key in object.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let mut values = Vec::with_capacity(rows.len());
            for (idx, row) in rows.iter().enumerate() {
                let cell = row.get(&name).unwrap_or(&serde_json::Value::Null);
                let value = Value::from_json(cell).ok_or_else(|| {
                    VeilError::Dataset(format!(
                        "Record {idx}, column '{name}': nested values are not supported"
                    ))
                })?;
                values.push(value);
            }
            columns.push(Column::new(name, values));
        }

        Self::new(columns)
    }

    /// Renders the dataset as a JSON array of row objects
    pub fn to_json_records(&self) -> serde_json::Value {
        let rows = (0..self.row_count())
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .map(|c| (c.name().to_string(), c.values()[row].to_json()))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dataset {
        Dataset::from_columns([
            ("age", vec![Value::Int(30), Value::Null, Value::Int(45)]),
            ("zip", vec!["10001".into(), "10002".into(), Value::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_dataset_shape() {
        let ds = sample();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column_names(), vec!["age", "zip"]);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = Dataset::from_columns([
            ("a", vec![Value::Int(1)]),
            ("b", vec![Value::Int(1), Value::Int(2)]),
        ]);
        assert!(matches!(result, Err(VeilError::Dataset(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Dataset::from_columns([("a", vec![]), ("a", vec![])]);
        assert!(matches!(result, Err(VeilError::Dataset(_))));
    }

    #[test]
    fn test_column_types() {
        let ds = sample();
        assert_eq!(ds.column("age").unwrap().dtype(), ColumnType::Integer);
        assert_eq!(ds.column("zip").unwrap().dtype(), ColumnType::Text);

        let floats = Column::new("f", vec![Value::Int(1), Value::Float(1.5)]);
        assert_eq!(floats.dtype(), ColumnType::Float);

        let empty = Column::new("e", vec![Value::Null, Value::Null]);
        assert_eq!(empty.dtype(), ColumnType::Empty);
        assert_eq!(empty.null_count(), 2);
    }

    #[test]
    fn test_json_records_round_trip_preserves_order() {
        let input = json!([
            {"name": "Ann", "age": 30},
            {"name": "Bob", "age": null, "city": "Oslo"}
        ]);
        let ds = Dataset::from_json_records(&input).unwrap();
        assert_eq!(ds.column_names(), vec!["name", "age", "city"]);
        assert_eq!(ds.column("city").unwrap().values()[0], Value::Null);

        let output = ds.to_json_records();
        assert_eq!(output[1]["city"], json!("Oslo"));
        assert_eq!(output[0]["age"], json!(30));
    }

    #[test]
    fn test_deserialize_applies_column_checks() {
        let valid = r#"{"columns": [
            {"name": "age", "values": [30, null]},
            {"name": "zip", "values": ["10001", "10002"]}
        ]}"#;
        let ds: Dataset = serde_json::from_str(valid).unwrap();
        assert_eq!(ds.row_count(), 2);

        let ragged = r#"{"columns": [
            {"name": "age", "values": [30, 31, 32]},
            {"name": "zip", "values": ["10001"]}
        ]}"#;
        let err = serde_json::from_str::<Dataset>(ragged).unwrap_err();
        assert!(err.to_string().contains("'zip' has 1 rows"), "{err}");

        let duplicate = r#"{"columns": [
            {"name": "a", "values": []},
            {"name": "a", "values": []}
        ]}"#;
        assert!(serde_json::from_str::<Dataset>(duplicate).is_err());
    }

    #[test]
    fn test_serialized_dataset_deserializes_back() {
        let ds = sample();
        let json = serde_json::to_string(&ds).unwrap();
        assert_eq!(serde_json::from_str::<Dataset>(&json).unwrap(), ds);
    }

    #[test]
    fn test_json_records_rejects_nested() {
        let input = json!([{"a": {"b": 1}}]);
        assert!(Dataset::from_json_records(&input).is_err());
        assert!(Dataset::from_json_records(&json!({"a": 1})).is_err());
    }
}
