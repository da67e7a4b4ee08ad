/*!
Single-request endpoint probing.

A `Prober` fires exactly one request per call and turns whatever happens into
a `ProbeOutcome`. It never returns an error and never retries; cascading and
ranking live in the evaluator.

## Classification

- status `< 500`: reachable (`ok`), 4xx included
- status `>= 500`: server fault, not ok, no error value
- transport failure: no status, `ProbeError::Network`
- timeout: no status, `ProbeError::Timeout`, `timed_out = true`
- unparseable base URL: no status, no latency, `ProbeError::MalformedTarget`
*/

use crate::core::debug_logger::get_debug_logger;
use crate::core::health::transport::{ProbeRequest, ProbeTransport, TransportError};
use crate::core::health::types::{ProbeError, ProbeOutcome, ProbeSpec};
use crate::core::health::url::{build_probe_url, extract_host};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Issues one request per spec through an injected transport
#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn ProbeTransport>,
    timeout: Duration,
}

impl Prober {
    pub fn new(transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fire `spec` against `base_url` and classify the result
    pub async fn probe(&self, base_url: &str, auth_token: &str, spec: &ProbeSpec) -> ProbeOutcome {
        self.probe_for("", base_url, auth_token, spec).await
    }

    /// Same as `probe`, tagging log entries with the target name
    pub async fn probe_for(
        &self,
        target_name: &str,
        base_url: &str,
        auth_token: &str,
        spec: &ProbeSpec,
    ) -> ProbeOutcome {
        let logger = get_debug_logger();

        let request = match self.build_request(base_url, auth_token, spec) {
            Ok(request) => request,
            Err(detail) => {
                logger.error_sync("Prober", "malformed_target", &detail);
                return ProbeOutcome::from_error(
                    spec.clone(),
                    ProbeError::MalformedTarget(detail),
                    None,
                );
            }
        };

        let correlation_id = format!("probe_{}", uuid::Uuid::new_v4().simple());
        let host = extract_host(&request.url).ok();
        logger.probe_start(
            target_name,
            &spec.label(),
            host.as_deref(),
            self.timeout.as_millis() as u64,
            correlation_id.clone(),
        );

        let start = Instant::now();
        // The transport is told about the timeout too; the outer timer bounds
        // transports that ignore it
        let result = tokio::time::timeout(self.timeout, self.transport.issue(request)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(Ok(response)) => {
                ProbeOutcome::from_status(spec.clone(), response.status_code, latency_ms)
            }
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                ProbeOutcome::from_error(spec.clone(), ProbeError::Timeout, Some(latency_ms))
            }
            Ok(Err(TransportError::Network(detail))) => {
                ProbeOutcome::from_error(spec.clone(), ProbeError::Network(detail), Some(latency_ms))
            }
            Ok(Err(TransportError::InvalidRequest(detail))) => ProbeOutcome::from_error(
                spec.clone(),
                ProbeError::MalformedTarget(detail),
                None,
            ),
        };

        let error_text = outcome.error.as_ref().map(|e| e.to_string());
        logger.probe_end(
            target_name,
            outcome.status_code,
            error_text.as_deref(),
            outcome.latency_ms,
            correlation_id,
        );

        outcome
    }

    /// Build the full request, or a description of why the URL is unusable
    pub fn build_request(
        &self,
        base_url: &str,
        auth_token: &str,
        spec: &ProbeSpec,
    ) -> Result<ProbeRequest, String> {
        let url = build_probe_url(base_url, &spec.path)
            .map_err(|e| format!("{} ({})", e, base_url))?;

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("authorization".to_string(), format!("Bearer {}", auth_token));
        if spec.send_version_header {
            headers.insert("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string());
        }
        if spec.body.is_some() {
            let content_type = spec.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
            headers.insert("content-type".to_string(), content_type.to_string());
        }
        for (name, value) in &spec.extra_headers {
            headers.insert(name.to_ascii_lowercase(), value.clone());
        }

        Ok(ProbeRequest {
            method: spec.method,
            url,
            headers,
            body: spec.body.clone(),
            timeout: self.timeout,
        })
    }
}
