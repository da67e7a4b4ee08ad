//! Loading of stored API configs and probe settings
//!
//! Path resolution priority, strongest first: explicit CLI path, environment
//! variable, default location under `~/.claude`.

use super::types::{ApiConfigEntry, ApiConfigs, ConfigError, HealthSettings};
use crate::core::debug_logger::get_debug_logger;
use crate::core::health::{BackendTarget, ProbeCatalog, ProbeSpec};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

pub const ENV_API_CONFIGS: &str = "CCS_API_CONFIGS";
pub const ENV_SETTINGS: &str = "CCS_SETTINGS";
pub const ENV_TIMEOUT_MS: &str = "CCS_TIMEOUT_MS";
pub const ENV_CONCURRENCY: &str = "CCS_CONCURRENCY";

fn claude_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".claude"))
        .ok_or(ConfigError::HomeDirNotFound)
}

/// `~/.claude/apiConfigs.json` unless overridden
pub fn resolve_api_configs_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env::var_os(ENV_API_CONFIGS).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(claude_dir()?.join("apiConfigs.json"))
}

/// `~/.claude/ccs/settings.toml` unless overridden
pub fn resolve_settings_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env::var_os(ENV_SETTINGS).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(claude_dir()?.join("ccs").join("settings.toml"))
}

/// Read the JSON array of API configs; a missing file is not an error
pub async fn load_api_configs(path: &Path) -> Result<ApiConfigs, ConfigError> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            get_debug_logger().debug_sync(
                "ConfigLoader",
                "api_configs_missing",
                &format!("No API config file at {}", path.display()),
            );
            return Ok(ApiConfigs {
                path: path.to_path_buf(),
                found: false,
                entries: Vec::new(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let entries: Vec<ApiConfigEntry> =
        serde_json::from_str(&data).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;

    get_debug_logger().config_loaded(path, entries.len());

    Ok(ApiConfigs {
        path: path.to_path_buf(),
        found: true,
        entries,
    })
}

/// Targets for a health run: one per distinct base URL, first occurrence wins,
/// entries without a base URL skipped
pub fn unique_targets(entries: &[ApiConfigEntry]) -> Vec<BackendTarget> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(ApiConfigEntry::to_target)
        .filter(|target| !target.base_url.is_empty())
        .filter(|target| seen.insert(target.base_url.clone()))
        .collect()
}

impl HealthSettings {
    /// Load settings from TOML, falling back to defaults when the file is absent,
    /// then apply environment overrides
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = match fs::read_to_string(path).await {
            Ok(data) => Self::parse(&data).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                get_debug_logger().debug_sync(
                    "ConfigLoader",
                    "settings_missing",
                    &format!("No settings file at {}, using defaults", path.display()),
                );
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    /// `CCS_TIMEOUT_MS` and `CCS_CONCURRENCY`; unparseable values are ignored
    pub fn apply_env_overrides(&mut self) {
        if let Some(ms) = parse_env::<u64>(ENV_TIMEOUT_MS).filter(|ms| *ms > 0) {
            self.timeout_ms = ms;
        }
        if let Some(n) = parse_env::<usize>(ENV_CONCURRENCY).filter(|n| *n > 0) {
            self.concurrency = n;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Custom catalog from `[[probes]]`, or the standard one
    pub fn catalog(&self) -> ProbeCatalog {
        if self.probes.is_empty() {
            ProbeCatalog::standard()
        } else {
            ProbeCatalog::new(self.probes.iter().map(ProbeSpec::from).collect())
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
