//! Schema reconciliation: deciding which columns the two sources can be compared on

use crate::source::{ColumnInfo, Source};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a declared column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseType {
    Numeric,
    Text,
    Boolean,
}

impl CoarseType {
    /// Classify a declared type name, returning `None` for types that cannot be compared
    pub fn classify(data_type: &str) -> Option<Self> {
        let upper = data_type.trim().to_ascii_uppercase();
        // DECIMAL(18,3), VARCHAR(20), TIMESTAMP WITH TIME ZONE...
        let base = upper
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("");

        match base {
            "TINYINT" | "SMALLINT" | "INTEGER" | "INT" | "BIGINT" | "HUGEINT" | "UTINYINT"
            | "USMALLINT" | "UINTEGER" | "UBIGINT" | "UHUGEINT" | "FLOAT" | "REAL" | "DOUBLE"
            | "DECIMAL" | "NUMERIC" | "INT1" | "INT2" | "INT4" | "INT8" | "INT16" | "INT32"
            | "INT64" | "INT128" | "UINT8" | "UINT16" | "UINT32" | "UINT64" | "FLOAT4"
            | "FLOAT8" | "FLOAT32" | "FLOAT64" | "I8" | "I16" | "I32" | "I64" | "U8" | "U16"
            | "U32" | "U64" | "F32" | "F64" | "LONG" | "SHORT" => Some(Self::Numeric),
            "BOOLEAN" | "BOOL" | "LOGICAL" => Some(Self::Boolean),
            "VARCHAR" | "TEXT" | "STRING" | "CHAR" | "BPCHAR" | "UTF8" | "UUID" | "ENUM"
            | "DATE" | "TIME" | "DATETIME" | "INTERVAL" | "TIMESTAMPTZ" => Some(Self::Text),
            other if other.starts_with("TIMESTAMP") => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for CoarseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A column both sources share with a compatible type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparableColumn {
    pub name: String,
    pub kind: CoarseType,
}

/// Outcome of comparing two schemas
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReconciliation {
    /// Ordered by the first source's column order
    pub comparable: Vec<ComparableColumn>,
    pub warnings: Vec<String>,
}

impl SchemaReconciliation {
    pub fn get(&self, name: &str) -> Option<&ComparableColumn> {
        self.comparable.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.comparable.iter().map(|c| c.name.clone()).collect()
    }
}

/// Compares the column sets and types of two sources
pub struct SchemaReconciler;

impl SchemaReconciler {
    /// Reconcile two schemas. Mismatches never fail; they become warnings.
    pub fn reconcile(
        df0: &Source,
        df1: &Source,
        df0_name: &str,
        df1_name: &str,
    ) -> SchemaReconciliation {
        let mut comparable = Vec::new();
        let mut warnings = Vec::new();

        for left in df0.columns() {
            let Some(right) = df1.column(&left.name) else {
                warnings.push(format!(
                    "Column '{}' is only present in '{}' and will not be compared",
                    left.name, df0_name
                ));
                continue;
            };

            match Self::reconcile_column(left, right) {
                Ok(kind) => comparable.push(ComparableColumn {
                    name: left.name.clone(),
                    kind,
                }),
                Err(reason) => warnings.push(format!(
                    "Column '{}' {} ({} in '{}', {} in '{}') and will not be compared",
                    left.name, reason, left.data_type, df0_name, right.data_type, df1_name
                )),
            }
        }

        for right in df1.columns() {
            if df0.column(&right.name).is_none() {
                warnings.push(format!(
                    "Column '{}' is only present in '{}' and will not be compared",
                    right.name, df1_name
                ));
            }
        }

        log::debug!(
            "Schema reconciliation: {} comparable columns, {} warnings",
            comparable.len(),
            warnings.len()
        );

        SchemaReconciliation {
            comparable,
            warnings,
        }
    }

    fn reconcile_column(left: &ColumnInfo, right: &ColumnInfo) -> Result<CoarseType, &'static str> {
        match (
            CoarseType::classify(&left.data_type),
            CoarseType::classify(&right.data_type),
        ) {
            (Some(a), Some(b)) if a == b => Ok(a),
            (Some(_), Some(_)) => Err("has incompatible types"),
            _ => Err("has an unsupported type"),
        }
    }
}
