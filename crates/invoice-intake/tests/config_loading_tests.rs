//! Table-driven tests for configuration loading and layering.

mod common;

use std::collections::HashMap;
use std::path::PathBuf;

use serial_test::serial;

use common::TestHarness;
use invoice_intake::config::load_config_from_str;
use invoice_intake::{ConfigError, ConfigLoader};

/// Represents a single config loading test case.
struct ConfigTestCase {
    name: &'static str,
    config_json: &'static str,
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "empty_object_uses_defaults",
        config_json: "{}",
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "paths_only",
        config_json: r#"{
            "watch_dir": "/srv/inbox",
            "success_dir": "/srv/filed/ok",
            "review_dir": "/srv/filed/review",
            "output_csv": "/srv/log/invoices.csv",
            "log_file": "/srv/log/run.log"
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "full",
        config_json: r#"{
            "watch_dir": "in",
            "settle_delay_ms": 0,
            "move_retries": 5,
            "retry_backoff_ms": 1000,
            "extract_timeout_secs": 0,
            "poll_interval_ms": 250,
            "debounce_ms": 100,
            "scan_existing": true
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "zero_retries",
        config_json: r#"{ "move_retries": 0 }"#,
        should_succeed: false,
        expected_error: Some("move_retries"),
    },
    ConfigTestCase {
        name: "empty_path",
        config_json: r#"{ "review_dir": "" }"#,
        should_succeed: false,
        expected_error: Some("review_dir"),
    },
    ConfigTestCase {
        name: "wrong_type",
        config_json: r#"{ "settle_delay_ms": "soon" }"#,
        should_succeed: false,
        expected_error: Some("parse config JSON"),
    },
    ConfigTestCase {
        name: "negative_number",
        config_json: r#"{ "retry_backoff_ms": -1 }"#,
        should_succeed: false,
        expected_error: None,
    },
    ConfigTestCase {
        name: "not_json",
        config_json: "watch_dir = ./input",
        should_succeed: false,
        expected_error: None,
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success but got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            assert!(
                result.is_err(),
                "Test '{}': Expected error but got success",
                test_case.name
            );

            if let Some(expected_error) = test_case.expected_error {
                let error_msg = result.err().unwrap().to_string();
                assert!(
                    error_msg.contains(expected_error),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected_error,
                    error_msg
                );
            }
        }
    }
}

#[test]
fn test_file_then_environment_precedence() {
    let harness = TestHarness::new();
    let path = harness.temp_path().join("intake.json");
    std::fs::write(
        &path,
        r#"{ "watch_dir": "/from/file", "move_retries": 7, "debounce_ms": 42 }"#,
    )
    .unwrap();

    let env: HashMap<&str, &str> = [("WATCH_DIR", "/from/env"), ("DEBOUNCE_MS", " ")]
        .into_iter()
        .collect();
    let config = ConfigLoader::new()
        .with_file(&path)
        .load_with(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.watch_dir, PathBuf::from("/from/env"));
    assert_eq!(config.move_retries, 7);
    // Blank environment values do not override
    assert_eq!(config.debounce_ms, 42);
    assert_eq!(config.settle_delay_ms, 500);
}

#[test]
fn test_missing_config_file_is_reported() {
    let harness = TestHarness::new();
    let result = ConfigLoader::new()
        .with_file(harness.temp_path().join("absent.json"))
        .load_with(|_| None);

    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn test_invalid_environment_number_is_reported() {
    let result = ConfigLoader::new().load_with(|key| {
        (key == "MOVE_RETRIES").then(|| "three".to_string())
    });

    match result {
        Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "MOVE_RETRIES"),
        other => panic!("Expected invalid MOVE_RETRIES, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_process_environment_is_read() {
    std::env::set_var("SCAN_EXISTING", "yes");
    std::env::set_var("EXTRACT_TIMEOUT_SECS", "0");
    let result = ConfigLoader::new().load();
    std::env::remove_var("SCAN_EXISTING");
    std::env::remove_var("EXTRACT_TIMEOUT_SECS");

    let config = result.unwrap();
    assert!(config.scan_existing);
    assert_eq!(config.extract_timeout(), None);
}
