//! Row alignment between the two sources, by grouping key or by position

use crate::error::{FingerprintError, Result};
use crate::source::{Source, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two sources a row comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSide {
    #[serde(rename = "df0")]
    Df0,
    #[serde(rename = "df1")]
    Df1,
}

impl fmt::Display for SourceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Df0 => write!(f, "df0"),
            Self::Df1 => write!(f, "df1"),
        }
    }
}

/// One unit of the alignment: a matched pair or a row without counterpart
#[derive(Debug, Clone, PartialEq)]
pub enum AlignedRow {
    Matched {
        key: Option<String>,
        df0_index: usize,
        df1_index: usize,
    },
    Unmatched {
        key: Option<String>,
        side: SourceSide,
        index: usize,
    },
}

impl AlignedRow {
    /// Rendered grouping key; `None` for positional alignment
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Matched { key, .. } | Self::Unmatched { key, .. } => key.as_deref(),
        }
    }
}

/// Ordered aligned rows plus the warnings raised while aligning
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub rows: Vec<AlignedRow>,
    pub warnings: Vec<String>,
}

impl Alignment {
    pub fn matched_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, AlignedRow::Matched { .. }))
            .count()
    }

    pub fn unmatched_count(&self, side: SourceSide) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, AlignedRow::Unmatched { side: s, .. } if *s == side))
            .count()
    }
}

/// Hashable, normalized form of one grouping-key value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of a non-integral float
    Float(u64),
    Text(String),
}

impl KeyPart {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(i) => Self::Int(*i),
            Value::Float(f) => Self::from_float(*f),
            Value::Text(s) => Self::Text(s.clone()),
        }
    }

    fn from_float(f: f64) -> Self {
        // 1.0 and 1 must land on the same key; this also folds -0.0 into 0
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Self::Int(f as i64)
        } else if f.is_nan() {
            Self::Float(f64::NAN.to_bits())
        } else {
            Self::Float(f.to_bits())
        }
    }
}

#[derive(Default)]
struct KeyBucket {
    label: String,
    df0: Vec<usize>,
    df1: Vec<usize>,
}

/// Pairs rows of two sources
pub struct RowAligner<'a> {
    df0: &'a Source,
    df1: &'a Source,
}

impl<'a> RowAligner<'a> {
    pub fn new(df0: &'a Source, df1: &'a Source) -> Self {
        Self { df0, df1 }
    }

    /// Align by key when grouping columns are given, otherwise by position
    pub fn align(
        &self,
        grouping_columns: Option<&[String]>,
        df0_name: &str,
        df1_name: &str,
    ) -> Result<Alignment> {
        match grouping_columns {
            Some(columns) if !columns.is_empty() => self.align_by_key(columns, df0_name, df1_name),
            _ => Ok(self.align_by_position()),
        }
    }

    /// Pair row i with row i; the tail of the longer source is unmatched
    pub fn align_by_position(&self) -> Alignment {
        let len0 = self.df0.row_count();
        let len1 = self.df1.row_count();
        let common = len0.min(len1);

        let mut rows: Vec<AlignedRow> = (0..common)
            .map(|i| AlignedRow::Matched {
                key: None,
                df0_index: i,
                df1_index: i,
            })
            .collect();

        rows.extend((common..len0).map(|index| AlignedRow::Unmatched {
            key: None,
            side: SourceSide::Df0,
            index,
        }));
        rows.extend((common..len1).map(|index| AlignedRow::Unmatched {
            key: None,
            side: SourceSide::Df1,
            index,
        }));

        log::debug!(
            "Positional alignment: {} pairs, {} unmatched",
            common,
            rows.len() - common
        );

        Alignment {
            rows,
            warnings: Vec::new(),
        }
    }

    /// Join on the grouping columns. Rows sharing a key are paired in row order.
    pub fn align_by_key(
        &self,
        columns: &[String],
        df0_name: &str,
        df1_name: &str,
    ) -> Result<Alignment> {
        let positions0 = Self::key_positions(self.df0, columns, df0_name)?;
        let positions1 = Self::key_positions(self.df1, columns, df1_name)?;

        let mut buckets: IndexMap<Vec<KeyPart>, KeyBucket> = IndexMap::new();
        for (index, row) in self.df0.rows().iter().enumerate() {
            Self::bucket_for(&mut buckets, row, &positions0).df0.push(index);
        }
        for (index, row) in self.df1.rows().iter().enumerate() {
            Self::bucket_for(&mut buckets, row, &positions1).df1.push(index);
        }

        let mut warnings = Vec::new();
        for (side_name, duplicated) in [
            (df0_name, buckets.values().filter(|b| b.df0.len() > 1).count()),
            (df1_name, buckets.values().filter(|b| b.df1.len() > 1).count()),
        ] {
            if duplicated > 0 {
                warnings.push(format!(
                    "Grouping columns [{}] are not unique in '{}': {} key value(s) occur more than once; duplicates are paired in row order",
                    columns.join(", "),
                    side_name,
                    duplicated
                ));
            }
        }

        let mut rows = Vec::with_capacity(self.df0.row_count().max(self.df1.row_count()));
        for bucket in buckets.into_values() {
            let paired = bucket.df0.len().min(bucket.df1.len());
            for (&df0_index, &df1_index) in bucket.df0.iter().zip(&bucket.df1) {
                rows.push(AlignedRow::Matched {
                    key: Some(bucket.label.clone()),
                    df0_index,
                    df1_index,
                });
            }
            for &index in &bucket.df0[paired..] {
                rows.push(AlignedRow::Unmatched {
                    key: Some(bucket.label.clone()),
                    side: SourceSide::Df0,
                    index,
                });
            }
            for &index in &bucket.df1[paired..] {
                rows.push(AlignedRow::Unmatched {
                    key: Some(bucket.label.clone()),
                    side: SourceSide::Df1,
                    index,
                });
            }
        }

        let alignment = Alignment { rows, warnings };
        log::debug!(
            "Key alignment on [{}]: {} pairs, {} unmatched in '{}', {} unmatched in '{}'",
            columns.join(", "),
            alignment.matched_count(),
            alignment.unmatched_count(SourceSide::Df0),
            df0_name,
            alignment.unmatched_count(SourceSide::Df1),
            df1_name
        );

        Ok(alignment)
    }

    fn key_positions(source: &Source, columns: &[String], name: &str) -> Result<Vec<usize>> {
        columns
            .iter()
            .map(|column| {
                source.position(column).ok_or_else(|| {
                    FingerprintError::config(format!(
                        "Grouping column '{}' is not present in '{}'",
                        column, name
                    ))
                })
            })
            .collect()
    }

    fn bucket_for<'b>(
        buckets: &'b mut IndexMap<Vec<KeyPart>, KeyBucket>,
        row: &[Value],
        positions: &[usize],
    ) -> &'b mut KeyBucket {
        let parts: Vec<KeyPart> = positions
            .iter()
            .map(|&p| KeyPart::from_value(&row[p]))
            .collect();

        buckets.entry(parts).or_insert_with_key(|parts| KeyBucket {
            label: key_label(parts),
            ..KeyBucket::default()
        })
    }
}

/// Render normalized key parts as one label, distinct for distinct keys.
///
/// Parts are joined with `|`. Inside text, `\` and `|` are backslash-escaped.
/// Text that starts with `"` or reads like a null, boolean or number is quoted.
fn key_label(parts: &[KeyPart]) -> String {
    parts
        .iter()
        .map(|part| match part {
            KeyPart::Null => "null".to_string(),
            KeyPart::Bool(b) => b.to_string(),
            KeyPart::Int(i) => i.to_string(),
            KeyPart::Float(bits) => f64::from_bits(*bits).to_string(),
            KeyPart::Text(s) => {
                let escaped = s.replace('\\', "\\\\").replace('|', "\\|");
                let ambiguous = s.starts_with('"')
                    || matches!(s.as_str(), "null" | "true" | "false")
                    || s.parse::<f64>().is_ok();
                if ambiguous {
                    format!("\"{}\"", escaped)
                } else {
                    escaped
                }
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}
