//! Integration tests for the compare command

use crate::common::assertions::assert_json_ratios_in_range;
use crate::common::{sample_data, CliTestRunner};
use datafingerprint::FingerprintError;

#[test]
fn test_compare_keyed_csv_files() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();

    let json = runner.compare_to_json(&before, &after, &["--group-by", "id"]).unwrap();

    let report = &json["report"];
    assert_eq!(report["df0_name"], "before");
    assert_eq!(report["df1_name"], "after");
    assert_eq!(report["df0_length"], 3);
    assert_eq!(report["df1_length"], 3);
    assert_eq!(report["comparable_columns"], serde_json::json!(["id", "name", "price"]));
    assert_eq!(report["matched_pairs"], 2);

    let rows = report["row_differences"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["status"], "mismatch");
    assert_eq!(rows[0]["key"], "1");
    assert_eq!(rows[0]["cells"][0]["column"], "price");
    assert_eq!(rows[1]["status"], "unmatched");
    assert_eq!(rows[1]["source"], "df0");
    assert_eq!(rows[2]["source"], "df1");

    let metrics = &json["metrics"];
    assert_eq!(metrics["row_differences"], 3);
    assert_eq!(metrics["overall_difference_ratio"], 0.5);
    assert_eq!(metrics["per_group_value"]["2"], 0.0);
    assert_json_ratios_in_range(metrics);
}

#[test]
fn test_compare_with_threshold_absorbs_small_change() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();

    let json = runner
        .compare_to_json(&before, &after, &["--group-by", "id", "--thresholds", "price=0.2"])
        .unwrap();

    assert_eq!(json["metrics"]["row_differences"], 2);
    let rows = json["report"]["row_differences"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["status"] == "unmatched"));
}

#[test]
fn test_compare_reports_schema_warnings() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner
        .fixture()
        .create_csv("after.csv", &sample_data::schema_changed_csv_data())
        .unwrap();

    let json = runner.compare_to_json(&before, &after, &["--group-by", "id"]).unwrap();

    let warnings = json["report"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("'category'"));
    assert_eq!(json["metrics"]["row_differences"], 0);
}

#[test]
fn test_compare_positional_by_default() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();

    let json = runner.compare_to_json(&before, &after, &[]).unwrap();

    assert!(json["report"]["grouping_columns"].is_null());
    assert!(json["metrics"].get("per_group_value").is_none());
    // Row 0 differs in price, row 2 differs in id, name and price
    assert_eq!(json["metrics"]["row_differences"], 2);
    assert_eq!(json["metrics"]["per_column"]["price"], 2.0 / 3.0);
}

#[test]
fn test_compare_custom_names() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("v1.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("v2.csv", &sample_data::simple_csv_data()).unwrap();

    let json = runner
        .compare_to_json(&before, &after, &["--df0-name", "staging", "--df1-name", "prod"])
        .unwrap();

    assert_eq!(json["report"]["df0_name"], "staging");
    assert_eq!(json["metrics"]["per_source"][1]["source"], "prod");
}

#[test]
fn test_compare_with_config_file() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let before = fixture.create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = fixture.create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();
    let config = fixture
        .create_json(
            "compare.json",
            &serde_json::json!({
                "df0_name": "from-config",
                "grouping_columns": ["id"],
                "thresholds": {"price": 0.2}
            }),
        )
        .unwrap();
    let config = config.to_string_lossy().into_owned();

    let json = runner.compare_to_json(&before, &after, &["--config", &config]).unwrap();

    assert_eq!(json["report"]["df0_name"], "from-config");
    assert_eq!(json["report"]["grouping_columns"], serde_json::json!(["id"]));
    assert_eq!(json["metrics"]["row_differences"], 2);
}

#[test]
fn test_compare_pretty_output() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();

    runner.expect_success(&[
        "compare",
        before.to_str().unwrap(),
        after.to_str().unwrap(),
        "--group-by",
        "id",
        "--max-rows",
        "1",
    ]);
}

#[test]
fn test_compare_unknown_grouping_column() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = runner.fixture().create_csv("after.csv", &sample_data::updated_csv_data()).unwrap();

    let err = runner.expect_failure(&[
        "compare",
        before.to_str().unwrap(),
        after.to_str().unwrap(),
        "--group-by",
        "sku",
    ]);
    assert!(err.is_config());
    assert!(err.to_string().contains("'sku'"));
}

#[test]
fn test_compare_negative_threshold() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();

    let err = runner.expect_failure(&[
        "compare",
        before.to_str().unwrap(),
        before.to_str().unwrap(),
        "--thresholds",
        "price=-1",
    ]);
    assert!(err.is_config());
}

#[test]
fn test_compare_malformed_threshold() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();

    let err = runner.expect_failure(&[
        "compare",
        before.to_str().unwrap(),
        before.to_str().unwrap(),
        "--thresholds",
        "price",
    ]);
    assert!(matches!(err, FingerprintError::InvalidInput { .. }));
}

#[test]
fn test_compare_invalid_format() {
    let runner = CliTestRunner::new().unwrap();
    let before = runner.fixture().create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();

    let err = runner.expect_failure(&[
        "compare",
        before.to_str().unwrap(),
        before.to_str().unwrap(),
        "--format",
        "xml",
    ]);
    assert!(err.to_string().contains("Invalid output format"));
}
