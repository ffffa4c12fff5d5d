//! Report assembly: runs the comparison pipeline and freezes its output

use crate::aggregate::{ColumnDifference, DifferenceAggregator, RowDifference};
use crate::align::{RowAligner, SourceSide};
use crate::cell::{CellComparator, ColumnRule};
use crate::error::{FingerprintError, Result};
use crate::schema::{CoarseType, SchemaReconciler, SchemaReconciliation};
use crate::source::Source;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-column numeric tolerances; missing columns use 0
pub type Thresholds = BTreeMap<String, f64>;

/// Result of comparing two sources. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataReport {
    df0_name: String,
    df1_name: String,
    df0_length: usize,
    df1_length: usize,
    grouping_columns: Option<Vec<String>>,
    comparable_columns: Vec<String>,
    column_differences: Vec<ColumnDifference>,
    row_differences: Vec<RowDifference>,
    matched_pairs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_units: Option<IndexMap<String, usize>>,
    warnings: Vec<String>,
}

impl DataReport {
    pub fn df0_name(&self) -> &str {
        &self.df0_name
    }

    pub fn df1_name(&self) -> &str {
        &self.df1_name
    }

    pub fn df0_length(&self) -> usize {
        self.df0_length
    }

    pub fn df1_length(&self) -> usize {
        self.df1_length
    }

    pub fn name(&self, side: SourceSide) -> &str {
        match side {
            SourceSide::Df0 => &self.df0_name,
            SourceSide::Df1 => &self.df1_name,
        }
    }

    pub fn length(&self, side: SourceSide) -> usize {
        match side {
            SourceSide::Df0 => self.df0_length,
            SourceSide::Df1 => self.df1_length,
        }
    }

    /// Grouping columns used for alignment; `None` means positional alignment
    pub fn grouping_columns(&self) -> Option<&[String]> {
        self.grouping_columns.as_deref()
    }

    pub fn comparable_columns(&self) -> &[String] {
        &self.comparable_columns
    }

    pub fn column_differences(&self) -> &[ColumnDifference] {
        &self.column_differences
    }

    pub fn row_differences(&self) -> &[RowDifference] {
        &self.row_differences
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn unmatched_count(&self, side: SourceSide) -> usize {
        self.row_differences
            .iter()
            .filter(|d| matches!(d, RowDifference::Unmatched { source, .. } if *source == side))
            .count()
    }

    /// Aligned units per grouping-key label, in alignment order
    pub fn group_units(&self) -> Option<&IndexMap<String, usize>> {
        self.group_units.as_ref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_differences(&self) -> bool {
        !self.row_differences.is_empty()
    }
}

/// Configures and runs one comparison
pub struct ReportBuilder<'a> {
    df0: &'a Source,
    df1: &'a Source,
    df0_name: String,
    df1_name: String,
    grouping_columns: Option<Vec<String>>,
    thresholds: Thresholds,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(df0: &'a Source, df1: &'a Source) -> Self {
        Self {
            df0,
            df1,
            df0_name: "df0".to_string(),
            df1_name: "df1".to_string(),
            grouping_columns: None,
            thresholds: Thresholds::new(),
        }
    }

    pub fn names(mut self, df0_name: impl Into<String>, df1_name: impl Into<String>) -> Self {
        self.df0_name = df0_name.into();
        self.df1_name = df1_name.into();
        self
    }

    /// Repeated names are dropped; an empty list means positional alignment
    pub fn grouping_columns(mut self, columns: Option<&[String]>) -> Self {
        self.grouping_columns = columns
            .map(|cols| cols.iter().cloned().collect::<IndexSet<_>>())
            .filter(|set| !set.is_empty())
            .map(|set| set.into_iter().collect());
        self
    }

    pub fn thresholds(mut self, thresholds: &Thresholds) -> Self {
        self.thresholds = thresholds.clone();
        self
    }

    /// Run reconciliation, alignment and aggregation.
    ///
    /// Configuration problems fail before any row is aligned.
    pub fn build(self) -> Result<DataReport> {
        self.validate_sources()?;
        self.validate_threshold_values()?;

        let schema = SchemaReconciler::reconcile(self.df0, self.df1, &self.df0_name, &self.df1_name);
        self.validate_grouping(&schema)?;

        let mut warnings = schema.warnings.clone();
        let comparator = CellComparator::new(self.resolve_rules(&schema, &mut warnings));

        let alignment = RowAligner::new(self.df0, self.df1).align(
            self.grouping_columns.as_deref(),
            &self.df0_name,
            &self.df1_name,
        )?;
        warnings.extend(alignment.warnings.iter().cloned());

        let aggregation = DifferenceAggregator::new(self.df0, self.df1, &comparator)
            .aggregate(&alignment, self.grouping_columns.is_some());

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        log::info!(
            "Compared '{}' ({} rows) with '{}' ({} rows): {} row differences",
            self.df0_name,
            self.df0.row_count(),
            self.df1_name,
            self.df1.row_count(),
            aggregation.row_differences.len()
        );

        Ok(DataReport {
            df0_length: self.df0.row_count(),
            df1_length: self.df1.row_count(),
            df0_name: self.df0_name,
            df1_name: self.df1_name,
            grouping_columns: self.grouping_columns,
            comparable_columns: schema.column_names(),
            column_differences: aggregation.column_differences,
            row_differences: aggregation.row_differences,
            matched_pairs: aggregation.matched_pairs,
            group_units: aggregation.group_units,
            warnings,
        })
    }

    fn validate_sources(&self) -> Result<()> {
        for (source, name) in [(self.df0, &self.df0_name), (self.df1, &self.df1_name)] {
            if source.column_count() == 0 {
                return Err(FingerprintError::config(format!(
                    "Data source '{}' has no columns",
                    name
                )));
            }
        }
        Ok(())
    }

    fn validate_threshold_values(&self) -> Result<()> {
        for (column, &value) in &self.thresholds {
            if !value.is_finite() {
                return Err(FingerprintError::config(format!(
                    "Threshold for column '{}' is not a number: {}",
                    column, value
                )));
            }
            if value < 0.0 {
                return Err(FingerprintError::config(format!(
                    "Threshold for column '{}' must be non-negative: {}",
                    column, value
                )));
            }
        }
        Ok(())
    }

    fn validate_grouping(&self, schema: &SchemaReconciliation) -> Result<()> {
        let Some(columns) = &self.grouping_columns else {
            return Ok(());
        };

        for column in columns {
            for (source, name) in [(self.df0, &self.df0_name), (self.df1, &self.df1_name)] {
                if source.column(column).is_none() {
                    return Err(FingerprintError::config(format!(
                        "Grouping column '{}' is not present in '{}'",
                        column, name
                    )));
                }
            }
            if schema.get(column).is_none() {
                return Err(FingerprintError::config(format!(
                    "Grouping column '{}' is not comparable between '{}' and '{}'",
                    column, self.df0_name, self.df1_name
                )));
            }
        }
        Ok(())
    }

    /// Pair every comparable column with its effective tolerance
    fn resolve_rules(&self, schema: &SchemaReconciliation, warnings: &mut Vec<String>) -> Vec<ColumnRule> {
        for column in self.thresholds.keys() {
            if schema.get(column).is_none() {
                warnings.push(format!(
                    "Threshold configured for column '{}', which is not a comparable column; it is ignored",
                    column
                ));
            }
        }

        schema
            .comparable
            .iter()
            .map(|column| {
                let configured = self.thresholds.get(&column.name).copied();
                let tolerance = match (column.kind, configured) {
                    (CoarseType::Numeric, Some(value)) => value,
                    (kind, Some(value)) if value > 0.0 => {
                        warnings.push(format!(
                            "Threshold {} configured for {} column '{}'; thresholds only apply to numeric columns, exact match is used",
                            value, kind, column.name
                        ));
                        0.0
                    }
                    _ => 0.0,
                };
                ColumnRule {
                    column: column.clone(),
                    tolerance,
                }
            })
            .collect()
    }
}

/// Compare two sources and build the report.
///
/// `grouping_columns` of `None` aligns rows by position.
pub fn compare(
    df0: &Source,
    df1: &Source,
    df0_name: &str,
    df1_name: &str,
    grouping_columns: Option<&[String]>,
    thresholds: &Thresholds,
) -> Result<DataReport> {
    ReportBuilder::new(df0, df1)
        .names(df0_name, df1_name)
        .grouping_columns(grouping_columns)
        .thresholds(thresholds)
        .build()
}
