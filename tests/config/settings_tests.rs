//! Probe settings: TOML parsing, custom catalogs and environment overrides

use crate::common::{create_temp_dir, IsolatedEnv};
use ccswitch::config::{resolve_settings_path, HealthSettings};
use ccswitch::core::health::{HttpMethod, ProbeCatalog};
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults() {
    let settings = HealthSettings::default();

    assert_eq!(settings.timeout_ms, 30_000);
    assert_eq!(settings.concurrency, 4);
    assert!(settings.probes.is_empty());
    assert_eq!(settings.timeout(), Duration::from_secs(30));
    assert_eq!(settings.catalog().specs(), ProbeCatalog::standard().specs());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let settings = HealthSettings::parse("timeout_ms = 5000\n").unwrap();

    assert_eq!(settings.timeout_ms, 5000);
    assert_eq!(settings.concurrency, 4);
}

#[test]
fn test_custom_probes_replace_catalog() {
    let settings = HealthSettings::parse(
        r#"
concurrency = 2

[[probes]]
path = "/status"
description = "Status Page"
send_version_header = false

[[probes]]
path = "/v1/messages"
method = "POST"
body = '{"model":"x","max_tokens":1}'
headers = { "x-api-key" = "k" }
"#,
    )
    .unwrap();

    assert_eq!(settings.concurrency, 2);
    let catalog = settings.catalog();
    let specs = catalog.specs();
    assert_eq!(specs.len(), 2);

    assert_eq!(specs[0].path, "/status");
    assert_eq!(specs[0].method, HttpMethod::Get);
    assert_eq!(specs[0].description, "Status Page");
    assert!(!specs[0].send_version_header);

    assert_eq!(specs[1].method, HttpMethod::Post);
    // Description falls back to the path
    assert_eq!(specs[1].description, "/v1/messages");
    assert!(specs[1].send_version_header);
    assert_eq!(
        specs[1].body.as_deref(),
        Some(br#"{"model":"x","max_tokens":1}"#.as_slice())
    );
    assert_eq!(
        specs[1].extra_headers.get("x-api-key").map(String::as_str),
        Some("k")
    );
}

#[test]
fn test_invalid_toml_is_error() {
    assert!(HealthSettings::parse("timeout_ms = \"soon\"").is_err());
}

#[tokio::test]
#[serial]
async fn test_missing_file_gives_defaults() {
    let _env = IsolatedEnv::new();
    let dir = create_temp_dir();

    let settings = HealthSettings::load(&dir.path().join("settings.toml"))
        .await
        .unwrap();

    assert_eq!(settings, HealthSettings::default());
}

#[tokio::test]
#[serial]
async fn test_env_overrides_file() {
    let env = IsolatedEnv::new();
    let dir = create_temp_dir();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "timeout_ms = 5000\nconcurrency = 2\n").unwrap();

    env.set("CCS_TIMEOUT_MS", "1500");
    env.set("CCS_CONCURRENCY", "not-a-number");

    let settings = HealthSettings::load(&path).await.unwrap();

    assert_eq!(settings.timeout_ms, 1500);
    // Unparseable overrides are ignored
    assert_eq!(settings.concurrency, 2);
}

#[tokio::test]
#[serial]
async fn test_malformed_settings_file_is_error() {
    let _env = IsolatedEnv::new();
    let dir = create_temp_dir();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[[probes]]\nmethod = \"GET\"\n").unwrap();

    let err = HealthSettings::load(&path).await.unwrap_err();
    assert!(err.to_string().contains("settings.toml"));
}

#[test]
#[serial]
fn test_settings_path_priority() {
    let env = IsolatedEnv::new();

    env.set("CCS_SETTINGS", "/tmp/ccs-settings.toml");
    assert_eq!(
        resolve_settings_path(None).unwrap(),
        PathBuf::from("/tmp/ccs-settings.toml")
    );
    assert_eq!(
        resolve_settings_path(Some(PathBuf::from("/tmp/cli.toml"))).unwrap(),
        PathBuf::from("/tmp/cli.toml")
    );
}
