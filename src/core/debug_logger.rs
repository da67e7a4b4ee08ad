//! JSON Lines debug logging for health checks
//!
//! Disabled unless `CCS_DEBUG` is truthy. Entries go to
//! `~/.claude/ccs/ccs-debug.log`, are size-rotated into gzip archives and have
//! credentials redacted before they touch disk.

use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const DEBUG_ENV_VAR: &str = "CCS_DEBUG";
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String, // local RFC 3339
    pub level: String,     // DEBUG, ERROR, PROBE, CONFIG
    pub component: String,
    pub event: String,
    pub message: String, // redacted
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, Value>,
}

struct RotatingLogFile {
    path: PathBuf,
    writes: AtomicU32,
}

impl RotatingLogFile {
    fn new(path: PathBuf) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Self {
            path,
            writes: AtomicU32::new(0),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if self.writes.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn oversized(&self) -> std::io::Result<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.oversized()? {
            return Ok(());
        }

        // Another process may be rotating the same file
        let lock_path = self.path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;
        if lock.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.oversized()? {
            self.compress_current()
        } else {
            Ok(())
        };
        let _ = std::fs::remove_file(&lock_path);
        result
    }

    fn compress_current(&self) -> std::io::Result<()> {
        let (dir, stem) = match self.dir_and_stem() {
            Some(parts) => parts,
            None => return Ok(()),
        };
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = dir.join(format!("{}.{}.gz", stem, stamp));

        let staging = self.path.with_extension("rotating");
        std::fs::rename(&self.path, &staging)?;

        let source = File::open(&staging)?;
        let mut encoder = GzEncoder::new(File::create(&archive_path)?, Compression::default());
        std::io::copy(&mut BufReader::new(source), &mut encoder)?;
        encoder.finish()?;
        std::fs::remove_file(&staging)?;

        let _ = prune_archives(dir, &stem);
        Ok(())
    }

    fn dir_and_stem(&self) -> Option<(&Path, String)> {
        let dir = self.path.parent()?;
        let stem = self.path.file_stem()?.to_str()?.to_string();
        Some((dir, stem))
    }
}

/// Keep only the newest MAX_ARCHIVES gzip archives for `stem`
fn prune_archives(dir: &Path, stem: &str) -> std::io::Result<()> {
    let prefix = format!("{}.", stem);
    let mut archives = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".gz") {
            archives.push((entry.path(), entry.metadata()?.modified()?));
        }
    }

    archives.sort_by_key(|(_, modified)| *modified);
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for (path, _) in archives.iter().take(excess) {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

pub struct EnhancedDebugLogger {
    enabled: bool,
    sink: Option<Mutex<RotatingLogFile>>,
    session_id: String,
    redaction_patterns: Vec<Regex>,
}

impl EnhancedDebugLogger {
    /// Logger configured from `CCS_DEBUG`
    pub fn new() -> Self {
        if parse_debug_enabled() {
            Self::with_log_path(default_log_path())
        } else {
            Self::build(None)
        }
    }

    /// Enabled logger writing to an explicit path
    pub fn with_log_path(path: PathBuf) -> Self {
        Self::build(Some(path))
    }

    fn build(path: Option<PathBuf>) -> Self {
        let session_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self {
            enabled: path.is_some(),
            sink: path.map(|p| Mutex::new(RotatingLogFile::new(p))),
            session_id,
            redaction_patterns: compile_redaction_patterns(),
        }
    }

    /// Redaction guardrails for credentials that leak into messages
    pub fn redact(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for regex in &self.redaction_patterns {
            redacted = regex.replace_all(&redacted, "[REDACTED]").to_string();
        }
        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        if let Some(sink) = &self.sink {
            if let (Ok(sink), Ok(line)) = (sink.lock(), serde_json::to_string(&entry)) {
                let _ = sink.append(&line);
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    // Typed events for the probing engine

    pub fn probe_start(
        &self,
        target: &str,
        endpoint: &str,
        host: Option<&str>,
        timeout_ms: u64,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), Value::from(target));
        fields.insert("endpoint".to_string(), Value::from(endpoint));
        fields.insert("timeout_ms".to_string(), Value::from(timeout_ms));
        if let Some(host) = host {
            fields.insert("host".to_string(), Value::from(host));
        }

        self.log_sync(
            "PROBE",
            "Prober",
            "probe_start",
            &format!("Probing {} for {}", endpoint, target),
            Some(correlation_id),
            fields,
        );
    }

    pub fn probe_end(
        &self,
        target: &str,
        status_code: Option<u16>,
        error: Option<&str>,
        latency_ms: Option<u64>,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), Value::from(target));
        if let Some(code) = status_code {
            fields.insert("http_status".to_string(), Value::from(code));
        }
        if let Some(error) = error {
            fields.insert("error".to_string(), Value::from(self.redact(error)));
        }
        if let Some(ms) = latency_ms {
            fields.insert("latency_ms".to_string(), Value::from(ms));
        }

        let summary = match (status_code, error) {
            (Some(code), _) => format!("status {}", code),
            (None, Some(error)) => error.to_string(),
            (None, None) => "no response".to_string(),
        };
        self.log_sync(
            "PROBE",
            "Prober",
            "probe_end",
            &format!("Probe for {} finished: {}", target, summary),
            Some(correlation_id),
            fields,
        );
    }

    pub fn cascade_complete(
        &self,
        target: &str,
        healthy: bool,
        status_code: Option<u16>,
        tried: usize,
        endpoint: &str,
    ) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), Value::from(target));
        fields.insert("healthy".to_string(), Value::from(healthy));
        fields.insert("tried".to_string(), Value::from(tried));
        fields.insert("endpoint".to_string(), Value::from(endpoint));
        if let Some(code) = status_code {
            fields.insert("http_status".to_string(), Value::from(code));
        }

        self.log_sync(
            "PROBE",
            "CascadeEvaluator",
            "cascade_complete",
            &format!(
                "{} is {} after {} probe(s)",
                target,
                if healthy { "healthy" } else { "unhealthy" },
                tried
            ),
            None,
            fields,
        );
    }

    pub fn target_cancelled(&self, target: &str) {
        let mut fields = HashMap::new();
        fields.insert("target".to_string(), Value::from(target));
        self.log_sync(
            "PROBE",
            "HealthChecker",
            "target_cancelled",
            &format!("Health check for {} cancelled", target),
            None,
            fields,
        );
    }

    pub fn config_loaded(&self, path: &Path, entries: usize) {
        let mut fields = HashMap::new();
        fields.insert(
            "path".to_string(),
            Value::from(path.display().to_string()),
        );
        fields.insert("entries".to_string(), Value::from(entries));
        self.log_sync(
            "CONFIG",
            "ConfigLoader",
            "config_loaded",
            &format!("Loaded {} API config(s)", entries),
            None,
            fields,
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide logger, configured from the environment on first use
pub fn get_debug_logger() -> &'static EnhancedDebugLogger {
    static LOGGER: OnceLock<EnhancedDebugLogger> = OnceLock::new();
    LOGGER.get_or_init(EnhancedDebugLogger::new)
}

/// Supports true/false, 1/0, yes/no, on/off (case insensitive)
fn parse_debug_enabled() -> bool {
    env::var(DEBUG_ENV_VAR)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}

fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("ccs")
        .join("ccs-debug.log")
}

fn compile_redaction_patterns() -> Vec<Regex> {
    [
        r"(?i)authorization[:=\s]+(bearer\s+)?[^\s,]+",
        r"(?i)bearer\s+[^\s,]+",
        r"(?i)api[_-]?key[:=\s]+[^\s,]+",
        r"(?i)(auth_)?token[:=\s]+[^\s,]+",
        r"(?i)secret[:=\s]+[^\s,]+",
        r"\bsk-[A-Za-z0-9_\-]{4,}",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}
