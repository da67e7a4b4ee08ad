//! API config loading, target derivation and path resolution

use crate::common::{create_temp_dir, IsolatedEnv};
use ccswitch::config::{
    load_api_configs, resolve_api_configs_path, unique_targets, ApiConfigEntry, ConfigError,
};
use serial_test::serial;
use std::path::PathBuf;

const MIXED_CONFIGS: &str = r#"[
  {
    "name": "nested",
    "config": {
      "env": {
        "ANTHROPIC_BASE_URL": "https://nested.example.com/",
        "ANTHROPIC_AUTH_TOKEN": "sk-nested-123456"
      }
    }
  },
  {
    "name": "flat",
    "ANTHROPIC_BASE_URL": "https://flat.example.com",
    "ANTHROPIC_AUTH_TOKEN": "sk-flat-abcdef"
  },
  {
    "ANTHROPIC_BASE_URL": "https://anonymous.example.com"
  }
]"#;

fn write_configs(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = create_temp_dir();
    let path = dir.path().join("apiConfigs.json");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_loads_both_entry_shapes() {
    let (_dir, path) = write_configs(MIXED_CONFIGS);

    let configs = load_api_configs(&path).await.unwrap();

    assert!(configs.found);
    assert_eq!(configs.entries.len(), 3);

    let nested = &configs.entries[0];
    assert_eq!(nested.display_name(), "nested");
    assert_eq!(nested.resolved_base_url(), "https://nested.example.com/");
    assert_eq!(nested.resolved_auth_token(), "sk-nested-123456");

    let flat = &configs.entries[1];
    assert_eq!(flat.resolved_base_url(), "https://flat.example.com");
    assert_eq!(flat.resolved_auth_token(), "sk-flat-abcdef");

    let anonymous = &configs.entries[2];
    assert_eq!(anonymous.display_name(), "unknown");
    assert_eq!(anonymous.resolved_auth_token(), "");
}

#[test]
fn test_nested_credentials_win_over_top_level() {
    let entry: ApiConfigEntry = serde_json::from_str(
        r#"{
            "name": "both",
            "config": { "env": { "ANTHROPIC_BASE_URL": "https://nested.example.com" } },
            "ANTHROPIC_BASE_URL": "https://flat.example.com",
            "ANTHROPIC_AUTH_TOKEN": "sk-flat"
        }"#,
    )
    .unwrap();

    assert_eq!(entry.resolved_base_url(), "https://nested.example.com");
    // Token is absent from the nested block, so the top-level one is used
    assert_eq!(entry.resolved_auth_token(), "sk-flat");
}

#[test]
fn test_empty_nested_value_falls_back() {
    let entry: ApiConfigEntry = serde_json::from_str(
        r#"{
            "name": "blank",
            "config": { "env": { "ANTHROPIC_BASE_URL": "" } },
            "ANTHROPIC_BASE_URL": "https://flat.example.com"
        }"#,
    )
    .unwrap();

    assert_eq!(entry.resolved_base_url(), "https://flat.example.com");
}

#[tokio::test]
async fn test_missing_file_is_empty_not_error() {
    let dir = create_temp_dir();
    let path = dir.path().join("does-not-exist.json");

    let configs = load_api_configs(&path).await.unwrap();

    assert!(!configs.found);
    assert!(configs.entries.is_empty());
    assert_eq!(configs.path, path);
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let (_dir, path) = write_configs("[{ not json");

    let err = load_api_configs(&path).await.unwrap_err();

    assert!(matches!(err, ConfigError::ParseJson { .. }));
    assert!(err.to_string().contains("apiConfigs.json"));
}

#[test]
fn test_unique_targets_dedupes_by_base_url() {
    let entries: Vec<ApiConfigEntry> = serde_json::from_str(
        r#"[
            { "name": "first",  "ANTHROPIC_BASE_URL": "https://same.example.com", "ANTHROPIC_AUTH_TOKEN": "a" },
            { "name": "empty",  "ANTHROPIC_BASE_URL": "" },
            { "name": "none" },
            { "name": "second", "ANTHROPIC_BASE_URL": "https://same.example.com", "ANTHROPIC_AUTH_TOKEN": "b" },
            { "name": "other",  "ANTHROPIC_BASE_URL": "  https://other.example.com  " }
        ]"#,
    )
    .unwrap();

    let targets = unique_targets(&entries);

    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["first", "other"]);
    assert_eq!(targets[0].auth_token, "a");
    assert_eq!(targets[1].base_url, "https://other.example.com");
}

#[test]
#[serial]
fn test_configs_path_priority() {
    let env = IsolatedEnv::new();

    let explicit = PathBuf::from("/tmp/explicit.json");
    env.set("CCS_API_CONFIGS", "/tmp/from-env.json");
    assert_eq!(
        resolve_api_configs_path(Some(explicit.clone())).unwrap(),
        explicit
    );
    assert_eq!(
        resolve_api_configs_path(None).unwrap(),
        PathBuf::from("/tmp/from-env.json")
    );

    env.set("CCS_API_CONFIGS", "");
    let default = resolve_api_configs_path(None).unwrap();
    assert!(default.ends_with(".claude/apiConfigs.json"));
}
