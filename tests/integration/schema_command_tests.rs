//! Integration tests for the schema command and file ingestion

use crate::common::{sample_data, CliTestRunner, TestFixture};
use datafingerprint::data::{load_sources, DataProcessor};
use datafingerprint::schema::CoarseType;
use datafingerprint::{FingerprintError, Value};

#[test]
fn test_schema_command_pretty_and_json() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner.fixture().create_csv("data.csv", &sample_data::simple_csv_data()).unwrap();
    let path = path.to_str().unwrap();

    runner.expect_success(&["schema", path]);
    runner.expect_success(&["schema", path, "--format", "json"]);
}

#[test]
fn test_schema_command_missing_file() {
    let runner = CliTestRunner::new().unwrap();
    let missing = runner.fixture().path("missing.csv");

    let err = runner.expect_failure(&["schema", missing.to_str().unwrap()]);
    assert!(matches!(err, FingerprintError::InvalidInput { .. }));
    assert!(err.to_string().contains("missing.csv"));
}

#[test]
fn test_loaded_source_types() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv(
            "mixed.csv",
            &[
                vec!["id", "name", "price", "active", "created_at"],
                vec!["1", "Product A", "19.99", "true", "2023-01-01"],
                vec!["2", "Product B", "", "false", "2023-01-02"],
            ],
        )
        .unwrap();

    let source = DataProcessor::new().unwrap().load_file(&path).unwrap();

    let kinds: Vec<Option<CoarseType>> = source
        .columns()
        .map(|c| CoarseType::classify(&c.data_type))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(CoarseType::Numeric),
            Some(CoarseType::Text),
            Some(CoarseType::Numeric),
            Some(CoarseType::Boolean),
            Some(CoarseType::Text),
        ]
    );
    assert_eq!(source.value(1, "price"), Some(&Value::Null));
    assert_eq!(source.value(0, "name"), Some(&Value::from("Product A")));
    assert_eq!(source.value(1, "created_at"), Some(&Value::from("2023-01-02")));
}

#[test]
fn test_load_sources_concurrently() {
    let fixture = TestFixture::new().unwrap();
    let before = fixture.create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let after = fixture.create_csv("after.csv", &sample_data::schema_changed_csv_data()).unwrap();

    let (df0, df1) = load_sources(&before, &after).unwrap();

    assert_eq!(df0.column_count(), 3);
    assert_eq!(df1.column_count(), 4);
    assert_eq!(df0.row_count(), 3);
    assert_eq!(df1.value(2, "category"), Some(&Value::from("Fruit")));
}

#[test]
fn test_load_sources_reports_first_failure() {
    let fixture = TestFixture::new().unwrap();
    let before = fixture.create_csv("before.csv", &sample_data::simple_csv_data()).unwrap();
    let missing = fixture.path("after.csv");

    let err = load_sources(&before, &missing).unwrap_err();
    assert!(err.to_string().contains("after.csv"));
}
