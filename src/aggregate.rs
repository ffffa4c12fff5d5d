//! Folding cell comparisons into column counts and row-level difference records

use crate::align::{AlignedRow, Alignment, SourceSide};
use crate::cell::{CellComparator, ColumnRule};
use crate::source::{Source, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of units in which a comparable column differs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDifference {
    pub column: String,
    pub count: usize,
    /// `count` divided by all aligned units (pairs and unmatched rows)
    pub ratio: f64,
}

/// A differing cell of a matched pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDifference {
    pub column: String,
    pub df0_value: Value,
    pub df1_value: Value,
}

/// A row-level difference, in alignment order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowDifference {
    /// Matched pair with at least one differing comparable column
    Mismatch {
        key: Option<String>,
        df0_index: usize,
        df1_index: usize,
        cells: Vec<CellDifference>,
    },
    /// Row without counterpart; differs as a whole
    Unmatched {
        key: Option<String>,
        source: SourceSide,
        index: usize,
        values: IndexMap<String, Value>,
    },
}

impl RowDifference {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Mismatch { key, .. } | Self::Unmatched { key, .. } => key.as_deref(),
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched { .. })
    }

    /// Whether this difference counts against the given source
    pub fn concerns(&self, side: SourceSide) -> bool {
        match self {
            Self::Mismatch { .. } => true,
            Self::Unmatched { source, .. } => *source == side,
        }
    }

    /// Columns that differ; empty for unmatched rows, which have no column attribution
    pub fn differing_columns(&self) -> Vec<&str> {
        match self {
            Self::Mismatch { cells, .. } => cells.iter().map(|c| c.column.as_str()).collect(),
            Self::Unmatched { .. } => Vec::new(),
        }
    }
}

/// Immutable result of folding an alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub column_differences: Vec<ColumnDifference>,
    pub row_differences: Vec<RowDifference>,
    pub matched_pairs: usize,
    pub units: usize,
    /// Aligned units per key label; only for key alignment
    pub group_units: Option<IndexMap<String, usize>>,
}

/// Running totals threaded through the fold
struct Tally {
    column_counts: Vec<usize>,
    row_differences: Vec<RowDifference>,
    matched_pairs: usize,
    units: usize,
    group_units: IndexMap<String, usize>,
}

/// Folds aligned rows into an [`Aggregation`]
pub struct DifferenceAggregator<'a> {
    df0: &'a Source,
    df1: &'a Source,
    comparator: &'a CellComparator,
    /// (rule, position in df0, position in df1)
    columns: Vec<(&'a ColumnRule, usize, usize)>,
}

impl<'a> DifferenceAggregator<'a> {
    /// Every rule must name a column present in both sources
    pub fn new(df0: &'a Source, df1: &'a Source, comparator: &'a CellComparator) -> Self {
        let columns = comparator
            .rules()
            .iter()
            .filter_map(|rule| {
                let name = rule.column.name.as_str();
                Some((rule, df0.position(name)?, df1.position(name)?))
            })
            .collect();

        Self {
            df0,
            df1,
            comparator,
            columns,
        }
    }

    pub fn aggregate(&self, alignment: &Alignment, keyed: bool) -> Aggregation {
        let initial = Tally {
            column_counts: vec![0; self.columns.len()],
            row_differences: Vec::new(),
            matched_pairs: 0,
            units: 0,
            group_units: IndexMap::new(),
        };

        let tally = alignment
            .rows
            .iter()
            .fold(initial, |tally, row| self.absorb(tally, row));

        let units = tally.units;
        let column_differences = self
            .columns
            .iter()
            .zip(tally.column_counts)
            .filter(|(_, count)| *count > 0)
            .map(|((rule, _, _), count)| ColumnDifference {
                column: rule.column.name.clone(),
                count,
                ratio: count as f64 / units as f64,
            })
            .collect();

        log::debug!(
            "Aggregated {} units: {} matched pairs, {} row differences",
            units,
            tally.matched_pairs,
            tally.row_differences.len()
        );

        Aggregation {
            column_differences,
            row_differences: tally.row_differences,
            matched_pairs: tally.matched_pairs,
            units,
            group_units: keyed.then_some(tally.group_units),
        }
    }

    fn absorb(&self, mut tally: Tally, row: &AlignedRow) -> Tally {
        tally.units += 1;
        if let Some(key) = row.key() {
            *tally.group_units.entry(key.to_string()).or_insert(0) += 1;
        }

        match row {
            AlignedRow::Matched {
                key,
                df0_index,
                df1_index,
            } => {
                tally.matched_pairs += 1;
                let left = &self.df0.rows()[*df0_index];
                let right = &self.df1.rows()[*df1_index];

                let mut cells = Vec::new();
                for (slot, (rule, p0, p1)) in self.columns.iter().enumerate() {
                    let (a, b) = (&left[*p0], &right[*p1]);
                    if self.comparator.compare(rule, a, b).is_different() {
                        tally.column_counts[slot] += 1;
                        cells.push(CellDifference {
                            column: rule.column.name.clone(),
                            df0_value: a.clone(),
                            df1_value: b.clone(),
                        });
                    }
                }

                if !cells.is_empty() {
                    tally.row_differences.push(RowDifference::Mismatch {
                        key: key.clone(),
                        df0_index: *df0_index,
                        df1_index: *df1_index,
                        cells,
                    });
                }
            }
            AlignedRow::Unmatched { key, side, index } => {
                for count in tally.column_counts.iter_mut() {
                    *count += 1;
                }

                let row = match side {
                    SourceSide::Df0 => &self.df0.rows()[*index],
                    SourceSide::Df1 => &self.df1.rows()[*index],
                };
                let values = self
                    .columns
                    .iter()
                    .map(|(rule, p0, p1)| {
                        let position = if *side == SourceSide::Df0 { *p0 } else { *p1 };
                        (rule.column.name.clone(), row[position].clone())
                    })
                    .collect();

                tally.row_differences.push(RowDifference::Unmatched {
                    key: key.clone(),
                    source: *side,
                    index: *index,
                    values,
                });
            }
        }

        tally
    }
}
