//! Equivalence classes over quasi-identifiers
//!
//! Rows with identical values in every quasi-identifier column form one
//! class. Missing values are a category of their own, so two rows that are
//! both null in a column still match there.

use crate::domain::{Column, Dataset, Value};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Hashable form of a cell value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum GroupKey {
    Null,
    Int(i64),
    Float(u64),
    Text(String),
}

impl From<&Value> for GroupKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Int(i) => Self::Int(*i),
            // -0.0 and 0.0 group together
            Value::Float(f) if *f == 0.0 => Self::Float(0.0f64.to_bits()),
            Value::Float(f) => Self::Float(f.to_bits()),
            Value::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// Partition of a dataset's rows into equivalence classes
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceClasses {
    quasi_identifiers: Vec<String>,
    row_class: Vec<usize>,
    sizes: Vec<usize>,
}

impl EquivalenceClasses {
    /// Groups rows by the given quasi-identifiers
    ///
    /// Names that are not columns of the dataset are ignored. Class ids
    /// follow the order in which classes first appear.
    pub fn compute(dataset: &Dataset, quasi_identifiers: &[String]) -> Self {
        let columns: Vec<&Column> = quasi_identifiers
            .iter()
            .filter_map(|name| dataset.column(name))
            .collect();

        let mut ids: HashMap<Vec<GroupKey>, usize> = HashMap::new();
        let mut sizes = Vec::new();
        let mut row_class = Vec::with_capacity(dataset.row_count());

        for row in 0..dataset.row_count() {
            let key: Vec<GroupKey> = columns
                .iter()
                .map(|column| GroupKey::from(&column.values()[row]))
                .collect();
            let next = sizes.len();
            let id = *ids.entry(key).or_insert(next);
            if id == next {
                sizes.push(0);
            }
            sizes[id] += 1;
            row_class.push(id);
        }

        Self {
            quasi_identifiers: columns.iter().map(|c| c.name().to_string()).collect(),
            row_class,
            sizes,
        }
    }

    /// Quasi-identifiers actually used
    pub fn quasi_identifiers(&self) -> &[String] {
        &self.quasi_identifiers
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether there are no classes (empty dataset)
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Number of rows partitioned
    pub fn row_count(&self) -> usize {
        self.row_class.len()
    }

    /// Class sizes by class id
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Class id of each row
    pub fn row_classes(&self) -> &[usize] {
        &self.row_class
    }

    /// Size of the class a row belongs to
    pub fn class_size_of_row(&self, row: usize) -> usize {
        self.sizes[self.row_class[row]]
    }

    /// Smallest class size, or 0 when there are no rows
    pub fn min_size(&self) -> usize {
        self.sizes.iter().copied().min().unwrap_or(0)
    }

    /// Mean class size, or 0 when there are no rows
    pub fn avg_size(&self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        self.row_count() as f64 / self.sizes.len() as f64
    }

    /// Rows in classes smaller than `k`
    pub fn rows_in_classes_below(&self, k: usize) -> usize {
        self.sizes.iter().filter(|size| **size < k).sum()
    }

    /// Distinct non-null values of `column` within each class
    pub fn distinct_counts(&self, column: &Column) -> Vec<usize> {
        let mut seen: Vec<HashSet<GroupKey>> = vec![HashSet::new(); self.sizes.len()];
        for (row, value) in column.values().iter().enumerate() {
            if value.is_null() {
                continue;
            }
            if let Some(class) = self.row_class.get(row) {
                seen[*class].insert(GroupKey::from(value));
            }
        }
        seen.iter().map(HashSet::len).collect()
    }
}

/// Memoizes equivalence classes per quasi-identifier set for one dataset
pub(crate) struct ClassCache<'a> {
    dataset: &'a Dataset,
    computed: HashMap<Vec<String>, Rc<EquivalenceClasses>>,
}

impl<'a> ClassCache<'a> {
    pub(crate) fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            computed: HashMap::new(),
        }
    }

    /// Classes over the present subset of `quasi_identifiers`
    pub(crate) fn classes(&mut self, quasi_identifiers: &[String]) -> Rc<EquivalenceClasses> {
        let present: Vec<String> = quasi_identifiers
            .iter()
            .filter(|name| self.dataset.has_column(name))
            .cloned()
            .collect();

        let dataset = self.dataset;
        Rc::clone(
            self.computed
                .entry(present)
                .or_insert_with_key(|key| Rc::new(EquivalenceClasses::compute(dataset, key))),
        )
    }

    #[cfg(test)]
    pub(crate) fn computed_sets(&self) -> usize {
        self.computed.len()
    }
}
