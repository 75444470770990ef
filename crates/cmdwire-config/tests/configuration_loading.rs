//! Loading behaviour for `cmdwire-config`.

use std::fs;
use std::str::FromStr;

use cmdwire_config::{Config, ConfigError, LogFormat};
use rstest::rstest;
use tempfile::TempDir;

#[test]
fn empty_document_yields_defaults() {
    let config = Config::from_toml_str("").expect("parse empty config");
    assert_eq!(config, Config::default());
    assert_eq!(config.jsonrpc_version(), "1.0");
    assert_eq!(config.log_filter(), "info");
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[test]
fn explicit_values_override_defaults() {
    let config = Config::from_toml_str(
        r#"
jsonrpc_version = "2.0"
log_filter = "cmdwire=trace"
log_format = "compact"
"#,
    )
    .expect("parse config");
    assert_eq!(config.jsonrpc_version(), "2.0");
    assert_eq!(config.log_filter(), "cmdwire=trace");
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
#[case::unknown_key("socket = \"/tmp/x\"")]
#[case::bad_format("log_format = \"xml\"")]
#[case::wrong_type("jsonrpc_version = 1")]
fn malformed_documents_are_rejected(#[case] text: &str) {
    let err = Config::from_toml_str(text).expect_err("config must be rejected");
    assert!(matches!(err, ConfigError::Parse(_)), "unexpected error: {err}");
}

#[test]
fn blank_protocol_version_is_invalid() {
    let err = Config::from_toml_str("jsonrpc_version = \"  \"").expect_err("blank version");
    assert!(
        matches!(err, ConfigError::Invalid { key: "jsonrpc_version", .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn load_reads_file_from_disk() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("cmdwire.toml");
    fs::write(&path, "log_format = \"compact\"\n").expect("write config");

    let config = Config::load(&path).expect("load config");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.jsonrpc_version(), "1.0");
}

#[test]
fn load_reports_missing_file() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("absent.toml");
    let err = Config::load(&path).expect_err("missing file");
    assert!(err.to_string().contains("absent.toml"), "message: {err}");
}

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::compact_upper("COMPACT", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(LogFormat::from_str(text).expect("parse"), expected);
}

#[test]
fn builder_overrides_apply() {
    let config = Config::default()
        .with_jsonrpc_version("2.0")
        .with_log_filter("debug")
        .with_log_format(LogFormat::Compact);
    assert_eq!(config.jsonrpc_version(), "2.0");
    assert_eq!(config.log_filter(), "debug");
    assert_eq!(config.log_format(), LogFormat::Compact);
}
