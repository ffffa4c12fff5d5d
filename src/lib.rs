//! # datafingerprint
//!
//! Compares two tabular datasets and summarizes where they differ: which
//! columns can be compared, how rows line up (by grouping key or by position),
//! which cells differ beyond a per-column numeric tolerance, and ratios that
//! describe the overall degree of difference.
//!
//! ```no_run
//! use datafingerprint::{compare, Metrics, Thresholds};
//! use datafingerprint::data::load_sources;
//! use std::path::Path;
//!
//! # fn main() -> datafingerprint::Result<()> {
//! let (before, after) = load_sources(Path::new("before.csv"), Path::new("after.csv"))?;
//! let grouping = vec!["id".to_string()];
//! let report = compare(&before, &after, "before", "after", Some(grouping.as_slice()), &Thresholds::new())?;
//! println!("{} row differences", Metrics::from_report(&report).row_differences);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod align;
pub mod cell;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod output;
pub mod progress;
pub mod report;
pub mod schema;
pub mod source;

pub use error::{FingerprintError, Result};
pub use metrics::Metrics;
pub use report::{compare, DataReport, ReportBuilder, Thresholds};
pub use source::{ColumnInfo, Source, Value};
