//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use datafingerprint::cli::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_cli_compare_command_defaults() {
    let cli = Cli::try_parse_from(["datafingerprint", "compare", "a.csv", "b.csv"]).unwrap();
    assert!(!cli.verbose);

    match cli.command {
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
            assert_eq!(df0, PathBuf::from("a.csv"));
            assert_eq!(df1, PathBuf::from("b.csv"));
            assert!(df0_name.is_none());
            assert!(df1_name.is_none());
            assert!(group_by.is_none());
            assert!(thresholds.is_none());
            assert!(config.is_none());
            assert_eq!(format, "pretty");
            assert!(output.is_none());
            assert_eq!(max_rows, 20);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_command_with_options() {
    let cli = Cli::try_parse_from([
        "datafingerprint",
        "compare",
        "v1.parquet",
        "v2.parquet",
        "--df0-name",
        "before",
        "--df1-name",
        "after",
        "--group-by",
        "id,date",
        "--thresholds",
        "price=0.01",
        "--config",
        "compare.json",
        "--format",
        "json",
        "--output",
        "out/report.json",
        "--max-rows",
        "5",
        "--verbose",
    ])
    .unwrap();
    assert!(cli.verbose);

    match cli.command {
        Commands::Compare {
            df0_name,
            df1_name,
            group_by,
            thresholds,
            config,
            format,
            output,
            max_rows,
            ..
        } => {
            assert_eq!(df0_name.as_deref(), Some("before"));
            assert_eq!(df1_name.as_deref(), Some("after"));
            assert_eq!(group_by.as_deref(), Some("id,date"));
            assert_eq!(thresholds.as_deref(), Some("price=0.01"));
            assert_eq!(config, Some(PathBuf::from("compare.json")));
            assert_eq!(format, "json");
            assert_eq!(output, Some(PathBuf::from("out/report.json")));
            assert_eq!(max_rows, 5);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_requires_two_files() {
    assert!(Cli::try_parse_from(["datafingerprint", "compare", "a.csv"]).is_err());
}

#[test]
fn test_cli_rejects_zero_max_rows() {
    let result = Cli::try_parse_from([
        "datafingerprint",
        "compare",
        "a.csv",
        "b.csv",
        "--max-rows",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_schema_command() {
    let cli = Cli::try_parse_from(["datafingerprint", "schema", "data.csv", "--format", "json"]).unwrap();
    match cli.command {
        Commands::Schema { input, format } => {
            assert_eq!(input, PathBuf::from("data.csv"));
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Schema command"),
    }
}

#[test]
fn test_cli_verbose_is_global() {
    let cli = Cli::try_parse_from(["datafingerprint", "-v", "schema", "data.csv"]).unwrap();
    assert!(cli.verbose);
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(["datafingerprint", "snapshot", "data.csv"]).is_err());
}

#[test]
fn test_output_format_parsing() {
    assert_eq!(OutputFormat::parse("Pretty"), Ok(OutputFormat::Pretty));
    assert_eq!(OutputFormat::parse("json"), Ok(OutputFormat::Json));
    let err = OutputFormat::parse("yaml").unwrap_err();
    assert!(err.contains("Use 'pretty' or 'json'"));
}
