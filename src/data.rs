//! Loading data files into [`Source`] values using DuckDB

use crate::error::{FingerprintError, Result};
use crate::schema::CoarseType;
use crate::source::{ColumnInfo, Source, Value};
use duckdb::types::ValueRef;
use duckdb::Connection;
use std::path::Path;

/// Data processor for various file formats
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(Self { connection })
    }

    /// Load a CSV, Parquet or JSON file into memory
    pub fn load_file(&self, file_path: &Path) -> Result<Source> {
        if !file_path.exists() {
            return Err(FingerprintError::invalid_input(format!(
                "File not found: {}",
                file_path.display()
            )));
        }
        if !file_path.is_file() {
            return Err(FingerprintError::invalid_input(format!(
                "Path is not a file: {}",
                file_path.display()
            )));
        }

        let path_str = file_path.to_string_lossy().replace('\'', "''");
        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW data_view AS SELECT * FROM '{}'",
            path_str
        );
        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| self.convert_duckdb_error(e, file_path))?;

        let columns = self.get_column_info()?;
        let rows = self.extract_rows(&columns)?;

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            columns.len(),
            file_path.display()
        );

        Source::new(columns, rows)
    }

    /// Convert DuckDB errors to appropriate FingerprintError types
    fn convert_duckdb_error(&self, error: duckdb::Error, file_path: &Path) -> FingerprintError {
        let error_msg = error.to_string();

        if error_msg.contains("CSV Error")
            || error_msg.contains("Could not convert")
            || error_msg.contains("Invalid Input Error")
            || error_msg.contains("Unterminated quoted field")
        {
            FingerprintError::invalid_input(format!(
                "Malformed file '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else if error_msg.contains("No files found") || error_msg.contains("does not exist") {
            FingerprintError::invalid_input(format!("File not found: {}", file_path.display()))
        } else if error_msg.contains("Permission denied") {
            FingerprintError::invalid_input(format!(
                "Permission denied accessing file: {}",
                file_path.display()
            ))
        } else {
            FingerprintError::DuckDb(error)
        }
    }

    /// Column names and types of the current view, in file order
    fn get_column_info(&self) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.connection.prepare("DESCRIBE data_view").map_err(|e| {
            FingerprintError::data_processing(format!("Failed to prepare describe query: {}", e))
        })?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get::<_, String>(0)?,
                    data_type: row.get::<_, String>(1)?,
                })
            })
            .map_err(|e| {
                FingerprintError::data_processing(format!("Failed to query column info: {}", e))
            })?;

        rows.collect::<duckdb::Result<Vec<_>>>().map_err(|e| {
            FingerprintError::data_processing(format!("Failed to process column info row: {}", e))
        })
    }

    fn extract_rows(&self, columns: &[ColumnInfo]) -> Result<Vec<Vec<Value>>> {
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let select_list = columns
            .iter()
            .map(Self::select_expr)
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {} FROM data_view", select_list);

        let mut stmt = self.connection.prepare(&sql).map_err(|e| {
            FingerprintError::data_processing(format!("Failed to prepare data extraction query: {}", e))
        })?;

        let column_count = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..column_count)
                    .map(|i| row.get_ref(i).map(Self::convert_value))
                    .collect::<duckdb::Result<Vec<Value>>>()
            })
            .map_err(|e| {
                FingerprintError::data_processing(format!("Failed to extract data rows: {}", e))
            })?;

        rows.collect::<duckdb::Result<Vec<_>>>().map_err(|e| {
            FingerprintError::data_processing(format!("Failed to process data row: {}", e))
        })
    }

    /// Project a column so every cell arrives as a bool, integer, double or text
    fn select_expr(column: &ColumnInfo) -> String {
        let quoted = format!("\"{}\"", column.name.replace('"', "\"\""));
        let base = column.data_type.to_ascii_uppercase();

        match CoarseType::classify(&column.data_type) {
            Some(CoarseType::Numeric)
                if base.starts_with("DECIMAL")
                    || base.starts_with("NUMERIC")
                    || base.contains("HUGEINT") =>
            {
                format!("CAST({} AS DOUBLE) AS {}", quoted, quoted)
            }
            Some(CoarseType::Numeric) | Some(CoarseType::Boolean) => quoted,
            _ => format!("CAST({} AS VARCHAR) AS {}", quoted, quoted),
        }
    }

    fn convert_value(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Boolean(b) => Value::Bool(b),
            ValueRef::TinyInt(i) => Value::Int(i.into()),
            ValueRef::SmallInt(i) => Value::Int(i.into()),
            ValueRef::Int(i) => Value::Int(i.into()),
            ValueRef::BigInt(i) => Value::Int(i),
            ValueRef::HugeInt(i) => i64::try_from(i).map(Value::Int).unwrap_or(Value::Float(i as f64)),
            ValueRef::UTinyInt(i) => Value::Int(i.into()),
            ValueRef::USmallInt(i) => Value::Int(i.into()),
            ValueRef::UInt(i) => Value::Int(i.into()),
            ValueRef::UBigInt(i) => i64::try_from(i).map(Value::Int).unwrap_or(Value::Float(i as f64)),
            ValueRef::Float(f) => Value::Float(f.into()),
            ValueRef::Double(f) => Value::Float(f),
            ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).to_string()),
            other => Value::Text(format!("{:?}", other)),
        }
    }
}

/// Load both inputs concurrently, each on its own connection
pub fn load_sources(df0_path: &Path, df1_path: &Path) -> Result<(Source, Source)> {
    let (df0, df1) = rayon::join(
        || DataProcessor::new()?.load_file(df0_path),
        || DataProcessor::new()?.load_file(df1_path),
    );
    Ok((df0?, df1?))
}
