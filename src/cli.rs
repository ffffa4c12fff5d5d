//! Command-line interface for datafingerprint

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datafingerprint")]
#[command(about = "Compare two tabular datasets and summarize their differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two data files
    Compare {
        /// Reference file (CSV, Parquet or JSON)
        df0: PathBuf,

        /// File compared against the reference
        df1: PathBuf,

        /// Display name of the reference (defaults to the file stem)
        #[arg(long)]
        df0_name: Option<String>,

        /// Display name of the compared file (defaults to the file stem)
        #[arg(long)]
        df1_name: Option<String>,

        /// Comma separated grouping columns, e.g. "id,date"; rows are aligned by position when omitted
        #[arg(long)]
        group_by: Option<String>,

        /// Numeric tolerances as "column=value" pairs, e.g. "price=0.01,qty=1"
        #[arg(long)]
        thresholds: Option<String>,

        /// JSON file with names, grouping columns and thresholds
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum number of difference lines to print (must be > 0)
        #[arg(long, default_value = "20", value_parser = validate_max_rows)]
        max_rows: usize,
    },

    /// Show the columns and row count of a data file
    Schema {
        /// Input file path
        input: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Validate that the printed row cap is greater than 0
fn validate_max_rows(s: &str) -> Result<usize, String> {
    let max_rows: usize = s
        .parse()
        .map_err(|_| format!("Invalid row limit: '{}'. Must be a positive integer.", s))?;

    if max_rows == 0 {
        return Err("Row limit must be greater than 0".to_string());
    }

    Ok(max_rows)
}
