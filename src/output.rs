//! Output formatting utilities

use crate::aggregate::RowDifference;
use crate::align::SourceSide;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::report::DataReport;
use crate::schema::CoarseType;
use crate::source::{Source, Value};
use serde::{Deserialize, Serialize};

/// One printable line of the difference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceRow {
    /// Key label, or the row index when aligned by position
    pub key: String,
    /// Differing column; `None` for an unmatched row
    pub column: Option<String>,
    pub df0_value: Option<String>,
    pub df1_value: Option<String>,
}

/// Flatten row differences: one line per differing cell, one per unmatched row
pub fn flatten_differences(report: &DataReport) -> Vec<DifferenceRow> {
    let mut lines = Vec::new();

    for difference in report.row_differences() {
        match difference {
            RowDifference::Mismatch {
                key,
                df0_index,
                cells,
                ..
            } => {
                let label = key.clone().unwrap_or_else(|| format!("row {}", df0_index));
                lines.extend(cells.iter().map(|cell| DifferenceRow {
                    key: label.clone(),
                    column: Some(cell.column.clone()),
                    df0_value: Some(cell.df0_value.to_string()),
                    df1_value: Some(cell.df1_value.to_string()),
                }));
            }
            RowDifference::Unmatched {
                key,
                source,
                index,
                values,
            } => {
                let rendered = values
                    .iter()
                    .map(|(column, value)| format!("{}={}", column, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                let (df0_value, df1_value) = match source {
                    SourceSide::Df0 => (Some(rendered), None),
                    SourceSide::Df1 => (None, Some(rendered)),
                };
                lines.push(DifferenceRow {
                    key: key.clone().unwrap_or_else(|| format!("row {}", index)),
                    column: None,
                    df0_value,
                    df1_value,
                });
            }
        }
    }

    lines
}

/// Pretty printer for datafingerprint output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print a comparison report with its metrics
    pub fn print_report(report: &DataReport, metrics: &Metrics, max_rows: usize) {
        print!("{}", Self::render_report(report, metrics, max_rows));
    }

    /// Print the columns of a single file
    pub fn print_schema(name: &str, source: &Source) {
        print!("{}", Self::render_schema(name, source));
    }

    pub fn render_report(report: &DataReport, metrics: &Metrics, max_rows: usize) -> String {
        let mut sections: Vec<(String, Vec<String>)> = Vec::new();

        sections.push((
            format!(
                "Rows: {} in '{}', {} in '{}'",
                report.df0_length(),
                report.df0_name(),
                report.df1_length(),
                report.df1_name()
            ),
            Vec::new(),
        ));

        let alignment = match report.grouping_columns() {
            Some(columns) => format!("Aligned by: {}", columns.join(", ")),
            None => "Aligned by: row position".to_string(),
        };
        sections.push((alignment, Vec::new()));

        sections.push((
            format!(
                "Comparable columns: {}",
                if report.comparable_columns().is_empty() {
                    "(none)".to_string()
                } else {
                    report.comparable_columns().join(", ")
                }
            ),
            Vec::new(),
        ));

        if report.column_differences().is_empty() {
            sections.push(("✅ Columns: no differences".to_string(), Vec::new()));
        } else {
            sections.push((
                format!(
                    "❌ Columns with differences: {}",
                    report.column_differences().len()
                ),
                report
                    .column_differences()
                    .iter()
                    .map(|c| format!("{}: {} ({})", c.column, c.count, format_ratio(c.ratio)))
                    .collect(),
            ));
        }

        if metrics.row_differences == 0 {
            sections.push(("✅ Rows: no differences".to_string(), Vec::new()));
        } else {
            let lines = flatten_differences(report);
            let mut children: Vec<String> = lines
                .iter()
                .take(max_rows)
                .map(|line| Self::difference_line(report, line))
                .collect();
            if lines.len() > max_rows {
                children.push(format!("... and {} more", lines.len() - max_rows));
            }
            sections.push((
                format!(
                    "❌ Rows with differences: {} ({} of all rows)",
                    metrics.row_differences,
                    format_ratio(metrics.overall_difference_ratio)
                ),
                children,
            ));
        }

        sections.push((
            "Differences per source:".to_string(),
            metrics
                .per_source
                .iter()
                .map(|s| {
                    format!(
                        "{}: {}/{} ({})",
                        s.source,
                        s.differing_rows,
                        s.total_rows,
                        format_ratio(s.ratio)
                    )
                })
                .collect(),
        ));

        if let Some(per_group) = &metrics.per_group_value {
            let mut children: Vec<String> = per_group
                .iter()
                .take(max_rows)
                .map(|(key, ratio)| format!("{}: {}", key, format_ratio(*ratio)))
                .collect();
            if per_group.len() > max_rows {
                children.push(format!("... and {} more", per_group.len() - max_rows));
            }
            sections.push(("Differences per key:".to_string(), children));
        }

        if !report.warnings().is_empty() {
            sections.push((
                format!("⚠️  Warnings: {}", report.warnings().len()),
                report.warnings().to_vec(),
            ));
        }

        let mut out = format!(
            "📊 Data fingerprint: {} → {}\n",
            report.df0_name(),
            report.df1_name()
        );
        out.push_str(&render_tree(&sections));
        out
    }

    pub fn render_schema(name: &str, source: &Source) -> String {
        let columns: Vec<String> = source
            .columns()
            .map(|c| match CoarseType::classify(&c.data_type) {
                Some(kind) => format!("{}: {} ({})", c.name, c.data_type, kind),
                None => format!("{}: {} (not comparable)", c.name, c.data_type),
            })
            .collect();

        let mut out = format!("📋 Schema: {}\n", name);
        out.push_str(&render_tree(&[
            (format!("Rows: {}", source.row_count()), Vec::new()),
            (format!("Columns: {}", source.column_count()), columns),
        ]));
        out
    }

    fn difference_line(report: &DataReport, line: &DifferenceRow) -> String {
        match (&line.column, &line.df0_value, &line.df1_value) {
            (Some(column), Some(before), Some(after)) => {
                format!("{} │ {}: {} → {}", line.key, column, before, after)
            }
            (None, Some(values), None) => {
                format!("{} │ only in '{}': {}", line.key, report.df0_name(), values)
            }
            (None, None, Some(values)) => {
                format!("{} │ only in '{}': {}", line.key, report.df1_name(), values)
            }
            _ => line.key.clone(),
        }
    }
}

/// Render (header, children) sections with tree prefixes
fn render_tree(sections: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();

    for (i, (header, children)) in sections.iter().enumerate() {
        let last_section = i == sections.len() - 1;
        let prefix = if last_section { "└─" } else { "├─" };
        let indent = if last_section { "   " } else { "│  " };
        out.push_str(&format!("{} {}\n", prefix, header));

        for (j, child) in children.iter().enumerate() {
            let child_prefix = if j == children.len() - 1 { "└─" } else { "├─" };
            out.push_str(&format!("{}{} {}\n", indent, child_prefix, child));
        }
    }

    out
}

fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Machine-readable comparison output
#[derive(Debug, Serialize)]
pub struct ComparisonOutput<'a> {
    pub report: &'a DataReport,
    pub metrics: &'a Metrics,
}

/// Column description for `schema` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    pub data_type: String,
    pub coarse_type: Option<CoarseType>,
}

/// Machine-readable `schema` output
#[derive(Debug, Serialize)]
pub struct SchemaOutput<'a> {
    pub name: &'a str,
    pub row_count: usize,
    pub columns: Vec<SchemaColumn>,
    pub sample_rows: Vec<&'a [Value]>,
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format a report and its metrics as `{ "report": .., "metrics": .. }`
    pub fn format_report(report: &DataReport, metrics: &Metrics) -> Result<String> {
        Self::format(&ComparisonOutput { report, metrics })
    }

    /// Format a file's schema, row count and first rows as JSON
    pub fn format_schema(name: &str, source: &Source) -> Result<String> {
        let columns = source
            .columns()
            .map(|c| SchemaColumn {
                name: c.name.clone(),
                data_type: c.data_type.clone(),
                coarse_type: CoarseType::classify(&c.data_type),
            })
            .collect();

        Self::format(&SchemaOutput {
            name,
            row_count: source.row_count(),
            columns,
            sample_rows: source.rows().iter().take(5).map(Vec::as_slice).collect(),
        })
    }
}
