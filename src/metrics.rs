//! Summary ratios derived from a [`DataReport`]
//!
//! Every function here is a pure read of the report; calling them repeatedly
//! yields identical results.

use crate::align::SourceSide;
use crate::report::DataReport;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Share of one source's rows involved in a difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRatio {
    pub source: String,
    pub side: SourceSide,
    pub differing_rows: usize,
    pub total_rows: usize,
    pub ratio: f64,
}

/// Matched-but-different pairs plus unmatched rows from both sides
pub fn number_of_row_differences(report: &DataReport) -> usize {
    report.row_differences().len()
}

/// Row differences relative to the rows of both sources together
pub fn overall_difference_ratio(report: &DataReport) -> f64 {
    let total_rows = report.df0_length() + report.df1_length();
    number_of_row_differences(report) as f64 / total_rows.max(1) as f64
}

/// For each source: (its unmatched rows + differing pairs) / its row count
pub fn ratio_of_differences_per_source(report: &DataReport) -> Vec<SourceRatio> {
    [SourceSide::Df0, SourceSide::Df1]
        .into_iter()
        .map(|side| {
            let differing_rows = report
                .row_differences()
                .iter()
                .filter(|d| d.concerns(side))
                .count();
            let total_rows = report.length(side);
            SourceRatio {
                source: report.name(side).to_string(),
                side,
                differing_rows,
                total_rows,
                ratio: differing_rows as f64 / total_rows.max(1) as f64,
            }
        })
        .collect()
}

/// For each grouping-key value: differing units / aligned units.
///
/// `None` when rows were aligned by position.
pub fn ratio_per_group_value(report: &DataReport) -> Option<IndexMap<String, f64>> {
    let group_units = report.group_units()?;

    let mut differing: IndexMap<&str, usize> = IndexMap::new();
    for key in report.row_differences().iter().filter_map(|d| d.key()) {
        *differing.entry(key).or_insert(0) += 1;
    }

    Some(
        group_units
            .iter()
            .filter(|(_, units)| **units > 0)
            .map(|(key, &units)| {
                let count = differing.get(key.as_str()).copied().unwrap_or(0);
                (key.clone(), count as f64 / units as f64)
            })
            .collect(),
    )
}

/// Column name to difference ratio, for columns with at least one difference
pub fn column_difference_ratio(report: &DataReport) -> IndexMap<String, f64> {
    report
        .column_differences()
        .iter()
        .map(|c| (c.column.clone(), c.ratio))
        .collect()
}

/// All summary metrics of a report in one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub row_differences: usize,
    pub overall_difference_ratio: f64,
    pub per_source: Vec<SourceRatio>,
    pub per_column: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_group_value: Option<IndexMap<String, f64>>,
}

impl Metrics {
    pub fn from_report(report: &DataReport) -> Self {
        Self {
            row_differences: number_of_row_differences(report),
            overall_difference_ratio: overall_difference_ratio(report),
            per_source: ratio_of_differences_per_source(report),
            per_column: column_difference_ratio(report),
            per_group_value: ratio_per_group_value(report),
        }
    }
}
