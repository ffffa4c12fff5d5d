//! Command implementations for datafingerprint CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::ComparisonConfig;
use crate::data::{load_sources, DataProcessor};
use crate::error::{FingerprintError, Result};
use crate::metrics::Metrics;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::report::compare;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Compare {
            df0,
            df1,
            df0_name,
            df1_name,
            group_by,
            thresholds,
            config,
            format,
            output,
            max_rows,
        } => {
            let settings = match config {
                Some(path) => ComparisonConfig::load(&path)?,
                None => ComparisonConfig::default(),
            }
            .merge_cli(df0_name, df1_name, group_by.as_deref(), thresholds.as_deref())?;

            compare_command(&df0, &df1, settings, &format, output.as_deref(), max_rows)
        }
        Commands::Schema { input, format } => schema_command(&input, &format),
    }
}

/// Compare two data files
fn compare_command(
    df0_path: &Path,
    df1_path: &Path,
    settings: ComparisonConfig,
    format: &str,
    output_path: Option<&Path>,
    max_rows: usize,
) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(|e| FingerprintError::invalid_input(e))?;

    let df0_name = settings
        .df0_name
        .unwrap_or_else(|| default_name(df0_path, "df0"));
    let df1_name = settings
        .df1_name
        .unwrap_or_else(|| default_name(df1_path, "df1"));

    let mut progress = match output_format {
        OutputFormat::Pretty => ProgressReporter::new_for_compare(),
        OutputFormat::Json => ProgressReporter::new_minimal(),
    };

    let (df0, df1) = load_sources(df0_path, df1_path)?;
    progress.finish_load(&format!(
        "Loaded {} and {} rows",
        df0.row_count(),
        df1.row_count()
    ));

    let report = compare(
        &df0,
        &df1,
        &df0_name,
        &df1_name,
        settings.grouping_columns.as_deref(),
        &settings.thresholds,
    )?;
    let metrics = Metrics::from_report(&report);
    progress.finish_compare("Comparison complete");
    drop(progress);

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_report(&report, &metrics, max_rows),
        OutputFormat::Json => println!("{}", JsonFormatter::format_report(&report, &metrics)?),
    }

    if let Some(output_path) = output_path {
        write_report(output_path, &JsonFormatter::format_report(&report, &metrics)?)?;
        if output_format == OutputFormat::Pretty {
            println!("\n💾 Report saved to: {}", output_path.display());
        }
    }

    Ok(())
}

/// Show the schema of one data file
fn schema_command(input: &Path, format: &str) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(|e| FingerprintError::invalid_input(e))?;

    let source = DataProcessor::new()?.load_file(input)?;
    let name = default_name(input, "input");

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_schema(&name, &source),
        OutputFormat::Json => println!("{}", JsonFormatter::format_schema(&name, &source)?),
    }

    Ok(())
}

/// Display name for a file: its stem, or `fallback` when it has none
fn default_name(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    log::debug!("Wrote JSON report to {}", path.display());
    Ok(())
}
