// Core types for endpoint health probing
use std::collections::HashMap;
use std::fmt;

/// One named endpoint configuration to be health-checked
///
/// Identity is `name`. Several targets may share a `base_url`; deduplication is
/// left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub name: String,
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` even when empty
    pub auth_token: String,
}

impl BackendTarget {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }
}

/// HTTP methods a probe may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single candidate request shape in the cascade catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Path joined onto the target's base URL (e.g. "/v1/models")
    pub path: String,
    pub method: HttpMethod,
    /// Human readable label shown next to the path
    pub description: String,
    /// Merged last; wins over built-in headers on case-insensitive conflict
    pub extra_headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Content type sent with `body`; defaults to application/json
    pub content_type: Option<String>,
    /// Whether to send the `anthropic-version` header
    pub send_version_header: bool,
}

impl ProbeSpec {
    /// GET spec with default headers
    pub fn get(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
            description: description.into(),
            extra_headers: HashMap::new(),
            body: None,
            content_type: None,
            send_version_header: true,
        }
    }

    /// POST spec carrying a JSON body
    pub fn post_json(
        path: impl Into<String>,
        description: impl Into<String>,
        body: &serde_json::Value,
    ) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body.to_string().into_bytes()),
            content_type: Some("application/json".to_string()),
            ..Self::get(path, description)
        }
    }

    pub fn without_version_header(mut self) -> Self {
        self.send_version_header = false;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// "path (description)" label used in reports
    pub fn label(&self) -> String {
        format!("{} ({})", self.path, self.description)
    }
}

/// Why a probe produced no HTTP status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The base URL could not be turned into a request URL; no I/O was attempted
    #[error("malformed target URL: {0}")]
    MalformedTarget(String),
    /// DNS, TLS, refused or reset connections
    #[error("{0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
}

/// The recorded result of firing one ProbeSpec at one BackendTarget
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub spec: ProbeSpec,
    pub status_code: Option<u16>,
    /// Dispatch to response/error; None only for malformed targets
    pub latency_ms: Option<u64>,
    pub error: Option<ProbeError>,
    pub timed_out: bool,
}

impl ProbeOutcome {
    pub fn from_status(spec: ProbeSpec, status_code: u16, latency_ms: u64) -> Self {
        Self {
            spec,
            status_code: Some(status_code),
            latency_ms: Some(latency_ms),
            error: None,
            timed_out: false,
        }
    }

    pub fn from_error(spec: ProbeSpec, error: ProbeError, latency_ms: Option<u64>) -> Self {
        let timed_out = error == ProbeError::Timeout;
        Self {
            spec,
            status_code: None,
            latency_ms,
            error: Some(error),
            timed_out,
        }
    }

    /// Server exists and answered: any status below 500, 4xx included
    pub fn ok(&self) -> bool {
        matches!(self.status_code, Some(code) if code < 500)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
    }

    /// Transport succeeded but the server reported an internal failure
    pub fn is_server_fault(&self) -> bool {
        matches!(self.status_code, Some(code) if code >= 500)
    }
}

/// Final healthy/unhealthy determination for one target
#[derive(Debug, Clone, PartialEq)]
pub struct HealthVerdict {
    pub target: BackendTarget,
    pub healthy: bool,
    /// None only when the catalog was empty
    pub chosen_outcome: Option<ProbeOutcome>,
    /// Every spec attempted, in order
    pub tried_specs: Vec<ProbeSpec>,
}

impl HealthVerdict {
    pub fn status_code(&self) -> Option<u16> {
        self.chosen_outcome.as_ref().and_then(|o| o.status_code)
    }

    pub fn latency_ms(&self) -> Option<u64> {
        self.chosen_outcome.as_ref().and_then(|o| o.latency_ms)
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.chosen_outcome.as_ref().and_then(|o| o.error.as_ref())
    }

    /// "path (description)" of the chosen spec, or a marker when nothing was tried
    pub fn endpoint_label(&self) -> String {
        match &self.chosen_outcome {
            Some(outcome) => outcome.spec.label(),
            None => "All endpoints failed".to_string(),
        }
    }
}

/// Per-target result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum TargetReport {
    Completed(HealthVerdict),
    /// The run was interrupted before this target's cascade finished
    Cancelled { target: BackendTarget },
}

impl TargetReport {
    pub fn target(&self) -> &BackendTarget {
        match self {
            TargetReport::Completed(verdict) => &verdict.target,
            TargetReport::Cancelled { target } => target,
        }
    }

    pub fn verdict(&self) -> Option<&HealthVerdict> {
        match self {
            TargetReport::Completed(verdict) => Some(verdict),
            TargetReport::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TargetReport::Cancelled { .. })
    }
}
