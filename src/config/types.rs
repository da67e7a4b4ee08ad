// Configuration types for stored API configs and probe settings
use crate::core::health::types::{BackendTarget, HttpMethod, ProbeSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "ANTHROPIC_AUTH_TOKEN";

/// One entry of `apiConfigs.json`
///
/// Credentials live either under `config.env` or at the top level; the nested
/// form wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfigEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: Option<NestedConfig>,
    #[serde(rename = "ANTHROPIC_BASE_URL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(rename = "ANTHROPIC_AUTH_TOKEN", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestedConfig {
    #[serde(default)]
    pub env: HashMap<String, Value>,
}

impl ApiConfigEntry {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("unknown")
    }

    fn nested_env(&self, key: &str) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|c| c.env.get(key))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn resolved_base_url(&self) -> &str {
        self.nested_env(ENV_BASE_URL)
            .or_else(|| self.base_url.as_deref())
            .unwrap_or("")
    }

    pub fn resolved_auth_token(&self) -> &str {
        self.nested_env(ENV_AUTH_TOKEN)
            .or_else(|| self.auth_token.as_deref())
            .unwrap_or("")
    }

    pub fn to_target(&self) -> BackendTarget {
        BackendTarget::new(
            self.display_name(),
            self.resolved_base_url().trim(),
            self.resolved_auth_token(),
        )
    }
}

/// Parsed `apiConfigs.json`
#[derive(Debug, Clone)]
pub struct ApiConfigs {
    pub path: PathBuf,
    /// False when the file did not exist
    pub found: bool,
    pub entries: Vec<ApiConfigEntry>,
}

/// Health check settings from `settings.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Per-probe timeout
    pub timeout_ms: u64,
    /// Maximum targets checked at once
    pub concurrency: usize,
    /// Replaces the standard catalog when non-empty
    pub probes: Vec<ProbeSpecConfig>,
}

/// `[[probes]]` entry in `settings.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeSpecConfig {
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub send_version_header: bool,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

fn default_true() -> bool {
    true
}

impl From<&ProbeSpecConfig> for ProbeSpec {
    fn from(cfg: &ProbeSpecConfig) -> Self {
        ProbeSpec {
            path: cfg.path.clone(),
            method: cfg.method,
            description: cfg.description.clone().unwrap_or_else(|| cfg.path.clone()),
            extra_headers: cfg.headers.clone(),
            body: cfg.body.as_ref().map(|b| b.clone().into_bytes()),
            content_type: cfg.content_type.clone(),
            send_version_header: cfg.send_version_header,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse API configs {}: {source}", .path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse settings {}: {source}", .path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
