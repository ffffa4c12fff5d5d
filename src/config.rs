//! Parsing of user-supplied comparison settings
//!
//! The comparator only accepts typed arguments; free-form strings coming from
//! the command line or a config file are turned into those types here.

use crate::error::{FingerprintError, Result};
use crate::report::Thresholds;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse a comma separated list of grouping columns.
///
/// Blank input means "align by position" and yields `None`.
pub fn parse_grouping_columns(input: &str) -> Option<Vec<String>> {
    let columns: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();

    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}

/// Parse `column=value` pairs separated by commas
pub fn parse_thresholds(input: &str) -> Result<Thresholds> {
    let mut thresholds = Thresholds::new();

    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (column, value) = entry.split_once('=').ok_or_else(|| {
            FingerprintError::invalid_input(format!(
                "Invalid threshold '{}': expected 'column=value'",
                entry
            ))
        })?;

        let column = column.trim();
        if column.is_empty() {
            return Err(FingerprintError::invalid_input(format!(
                "Invalid threshold '{}': column name is empty",
                entry
            )));
        }

        let value: f64 = value.trim().parse().map_err(|_| {
            FingerprintError::invalid_input(format!(
                "Invalid threshold '{}': '{}' is not a number",
                entry,
                value.trim()
            ))
        })?;

        thresholds.insert(column.to_string(), value);
    }

    Ok(thresholds)
}

/// Comparison settings, as stored in a JSON config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    pub df0_name: Option<String>,
    pub df1_name: Option<String>,
    pub grouping_columns: Option<Vec<String>>,
    pub thresholds: Thresholds,
}

impl ComparisonConfig {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded comparison config from {}", path.display());
        Ok(config)
    }

    /// Overlay command-line values; a value given on the command line wins
    pub fn merge_cli(
        mut self,
        df0_name: Option<String>,
        df1_name: Option<String>,
        group_by: Option<&str>,
        thresholds: Option<&str>,
    ) -> Result<Self> {
        if df0_name.is_some() {
            self.df0_name = df0_name;
        }
        if df1_name.is_some() {
            self.df1_name = df1_name;
        }
        if let Some(group_by) = group_by {
            self.grouping_columns = parse_grouping_columns(group_by);
        }
        if let Some(thresholds) = thresholds {
            self.thresholds.extend(parse_thresholds(thresholds)?);
        }
        Ok(self)
    }
}
