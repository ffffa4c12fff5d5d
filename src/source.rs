//! In-memory tabular sources handed to the comparator

use crate::error::{FingerprintError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed cell value.
///
/// JSON has no NaN or infinity, so non-finite floats serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // NaN equals NaN, matching cell comparison
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Column information for schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Type name as reported by the ingestion layer, e.g. `BIGINT` or `VARCHAR`
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A fully materialized table: ordered columns and ordered rows
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    schema: IndexMap<String, ColumnInfo>,
    rows: Vec<Vec<Value>>,
}

impl Source {
    /// Build a source, checking column names are unique and every row is complete
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut schema = IndexMap::with_capacity(columns.len());
        for column in columns {
            if schema.contains_key(&column.name) {
                return Err(FingerprintError::invalid_input(format!(
                    "Duplicate column name: '{}'",
                    column.name
                )));
            }
            schema.insert(column.name.clone(), column);
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schema.len())
        {
            return Err(FingerprintError::invalid_input(format!(
                "Row {} has {} values but the schema has {} columns",
                index,
                row.len(),
                schema.len()
            )));
        }

        Ok(Self { schema, rows })
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.schema.values()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.keys().map(String::as_str).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.schema.get(name)
    }

    /// Position of a column within each row
    pub fn position(&self, name: &str) -> Option<usize> {
        self.schema.get_index_of(name)
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.position(column)?;
        self.rows.get(row)?.get(position)
    }
}
