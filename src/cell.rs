//! Tolerance-aware equality of two cell values

use crate::schema::{CoarseType, ComparableColumn};
use crate::source::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOutcome {
    Equal,
    Different,
}

impl CellOutcome {
    pub fn is_different(self) -> bool {
        self == Self::Different
    }
}

/// Compare two values of a column of the given kind.
///
/// Nulls only equal nulls. Numbers are equal when `|a - b| <= tolerance`;
/// the tolerance is ignored for every other kind.
pub fn compare_cells(kind: CoarseType, tolerance: f64, a: &Value, b: &Value) -> CellOutcome {
    let equal = match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Int(x), Value::Int(y)) if kind == CoarseType::Numeric => {
            x == y || (tolerance > 0.0 && ((*x as i128 - *y as i128).abs() as f64) <= tolerance)
        }
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i))
            if kind == CoarseType::Numeric =>
        {
            int_float_equal(*i, *f, tolerance)
        }
        _ if kind == CoarseType::Numeric => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => numbers_equal(x, y, tolerance),
            _ => a == b,
        },
        _ => a == b,
    };

    if equal {
        CellOutcome::Equal
    } else {
        CellOutcome::Different
    }
}

fn int_float_equal(i: i64, f: f64, tolerance: f64) -> bool {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        let delta = (i as i128 - f as i128).abs();
        return delta == 0 || (tolerance > 0.0 && delta as f64 <= tolerance);
    }
    // only an integral float within i64 range can equal an integer exactly
    tolerance > 0.0 && numbers_equal(i as f64, f, tolerance)
}

fn numbers_equal(x: f64, y: f64, tolerance: f64) -> bool {
    if x.is_nan() || y.is_nan() {
        return x.is_nan() && y.is_nan();
    }
    // equal infinities would otherwise produce NaN below
    x == y || (x - y).abs() <= tolerance
}

/// A comparable column together with the tolerance that applies to it
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRule {
    pub column: ComparableColumn,
    pub tolerance: f64,
}

/// Compares aligned rows column by column
#[derive(Debug, Clone)]
pub struct CellComparator {
    rules: Vec<ColumnRule>,
}

impl CellComparator {
    /// Tolerances must already be resolved: zero for non-numeric columns
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    pub fn compare(&self, rule: &ColumnRule, a: &Value, b: &Value) -> CellOutcome {
        compare_cells(rule.column.kind, rule.tolerance, a, b)
    }
}
