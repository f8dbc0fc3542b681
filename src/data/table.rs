//! Identifier-keyed label tables and the left-join used to merge them.

use crate::data::{ClusterAssignments, Value};
use crate::error::{CongruenceError, Result};
use log::warn;
use std::collections::HashMap;

/// Canonical name of the identifier column.
pub const ID_COLUMN: &str = "Seq_ID";

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of non-missing values.
    pub fn n_present(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

/// A table of label columns keyed by identifier, one row per identifier entry.
///
/// Tables are never modified in place: joins return a new table so the
/// reference table can be shared by every coverage mode.
#[derive(Debug, Clone)]
pub struct LabelTable {
    ids: Vec<Value>,
    columns: Vec<Column>,
}

impl LabelTable {
    /// Create a table, checking every column has one value per identifier.
    pub fn new(ids: Vec<Value>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != ids.len() {
                return Err(CongruenceError::LengthMismatch {
                    expected: ids.len(),
                    actual: column.values.len(),
                });
            }
        }
        Ok(Self { ids, columns })
    }

    /// Identifiers in row order.
    pub fn ids(&self) -> &[Value] {
        &self.ids
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order, excluding the identifier column.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Full header: [`ID_COLUMN`] followed by the label column names.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(ID_COLUMN)
            .chain(self.columns.iter().map(|c| c.name()))
            .collect()
    }

    /// Look up a column by its exact name. The first match wins.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Left-join cluster assignments as a new column named `name`.
    ///
    /// Every row of `self` is kept; rows whose identifier has no assignment
    /// (or is missing) get [`Value::Missing`]. Assignments for identifiers
    /// not in the table are dropped.
    pub fn left_join(&self, name: &str, assignments: &ClusterAssignments) -> Self {
        let values = self
            .ids
            .iter()
            .map(|id| {
                id.key()
                    .and_then(|key| assignments.get(&key))
                    .cloned()
                    .unwrap_or(Value::Missing)
            })
            .collect();
        self.with_column(Column::new(name, values))
    }

    /// Add a column of missing values named `name`.
    pub fn with_missing_column(&self, name: &str) -> Self {
        self.with_column(Column::new(name, vec![Value::Missing; self.n_rows()]))
    }

    fn with_column(&self, column: Column) -> Self {
        let mut columns = self.columns.clone();
        columns.push(column);
        Self {
            ids: self.ids.clone(),
            columns,
        }
    }

    /// Map normalized column names (trimmed, lower-cased) to original names.
    pub fn column_index(&self) -> ColumnIndex {
        ColumnIndex::new(self.column_names())
    }
}

/// Explicit normalized-name → original-name mapping for column lookup.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    names: HashMap<String, String>,
}

impl ColumnIndex {
    pub fn new<'a>(originals: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names = HashMap::new();
        for original in originals {
            let normalized = normalize_column_name(original);
            if let Some(existing) = names.get(&normalized) {
                warn!(
                    "Columns '{}' and '{}' both normalize to '{}'; using '{}'",
                    existing, original, normalized, existing
                );
                continue;
            }
            names.insert(normalized, original.to_string());
        }
        Self { names }
    }

    /// Original column name for a normalized name.
    pub fn original(&self, normalized: &str) -> Option<&str> {
        self.names.get(normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Normalize a column name for case-insensitive matching.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}
