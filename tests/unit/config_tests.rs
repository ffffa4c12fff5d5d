//! Unit tests for grouping/threshold parsing and config files

use crate::common::TestFixture;
use datafingerprint::config::{parse_grouping_columns, parse_thresholds, ComparisonConfig};
use datafingerprint::FingerprintError;

#[test]
fn test_grouping_columns_keep_order() {
    assert_eq!(
        parse_grouping_columns("date,id"),
        Some(vec!["date".to_string(), "id".to_string()])
    );
    assert_eq!(parse_grouping_columns("   "), None);
}

#[test]
fn test_thresholds_last_entry_wins() {
    let thresholds = parse_thresholds("val=1, val=0.25").unwrap();
    assert_eq!(thresholds.len(), 1);
    assert_eq!(thresholds["val"], 0.25);
}

#[test]
fn test_thresholds_accept_scientific_notation() {
    let thresholds = parse_thresholds("val=1e-3").unwrap();
    assert_eq!(thresholds["val"], 0.001);
}

#[test]
fn test_negative_threshold_parses_but_comparison_rejects_it() {
    // Parsing is syntactic; the value check happens when the report is built
    let thresholds = parse_thresholds("val=-1").unwrap();
    assert_eq!(thresholds["val"], -1.0);
}

#[test]
fn test_malformed_threshold_message_names_entry() {
    let err = parse_thresholds("val:0.5").unwrap_err();
    assert!(matches!(err, FingerprintError::InvalidInput { .. }));
    assert!(err.to_string().contains("val:0.5"));
}

#[test]
fn test_empty_config_file_object() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.create_json("empty.json", &serde_json::json!({})).unwrap();

    let config = ComparisonConfig::load(&path).unwrap();
    assert_eq!(config, ComparisonConfig::default());
}

#[test]
fn test_cli_group_by_replaces_config_grouping() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_json(
            "compare.json",
            &serde_json::json!({"grouping_columns": ["id"], "df1_name": "prod"}),
        )
        .unwrap();

    let config = ComparisonConfig::load(&path)
        .unwrap()
        .merge_cli(None, None, Some("region,id"), None)
        .unwrap();

    assert_eq!(
        config.grouping_columns,
        Some(vec!["region".to_string(), "id".to_string()])
    );
    assert_eq!(config.df1_name.as_deref(), Some("prod"));
}

#[test]
fn test_blank_cli_group_by_means_positional() {
    let config = ComparisonConfig {
        grouping_columns: Some(vec!["id".to_string()]),
        ..Default::default()
    }
    .merge_cli(None, None, Some(""), None)
    .unwrap();

    assert!(config.grouping_columns.is_none());
}

#[test]
fn test_merge_cli_propagates_threshold_errors() {
    let result = ComparisonConfig::default().merge_cli(None, None, None, Some("price"));
    assert!(result.is_err());
}

#[test]
fn test_config_is_serializable() {
    let config = ComparisonConfig::default()
        .merge_cli(Some("a".into()), Some("b".into()), Some("id"), Some("val=0.5"))
        .unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["df0_name"], "a");
    assert_eq!(json["thresholds"]["val"], 0.5);
}
