//! Probe Transport Implementations
//!
//! HTTP client abstraction used by the prober. The prober builds a complete
//! `ProbeRequest`; the transport only issues it and reports the status line.

use crate::core::health::types::HttpMethod;
use std::collections::HashMap;
use std::time::Duration;

use isahc::config::{Configurable, RedirectPolicy};
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Fully built request for one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl ProbeRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Status line of a completed exchange; the body has already been drained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timeout")]
    Timeout,
    /// Connection, DNS or TLS failure before a status line arrived
    #[error("{0}")]
    Network(String),
    /// The request could not be constructed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Capability for issuing probe requests
///
/// Implementations must not retry and must honour `request.timeout`.
#[async_trait::async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn issue(&self, request: ProbeRequest) -> Result<TransportResponse, TransportError>;
}

/// Production transport implementation using isahc
pub struct IsahcTransport {
    client: HttpClient,
}

impl IsahcTransport {
    /// Client honouring the system proxy configuration
    pub fn new() -> Result<Self, TransportError> {
        Self::build(HttpClient::builder().redirect_policy(RedirectPolicy::None))
    }

    /// Client that connects directly, ignoring proxy environment variables
    pub fn without_proxy() -> Result<Self, TransportError> {
        Self::build(
            HttpClient::builder()
                .redirect_policy(RedirectPolicy::None)
                .proxy(None::<isahc::http::Uri>),
        )
    }

    fn build(builder: isahc::HttpClientBuilder) -> Result<Self, TransportError> {
        let client = builder.build().map_err(|e| {
            TransportError::InvalidRequest(format!("Failed to create probe client: {}", e))
        })?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ProbeTransport for IsahcTransport {
    async fn issue(&self, request: ProbeRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str())
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let http_request = builder
            .body(request.body.unwrap_or_default())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut response = self
            .client
            .send_async(http_request)
            .await
            .map_err(classify_isahc_error)?;

        let status_code = response.status().as_u16();

        // Drain the body to release the connection; a failure here does not
        // change the status that was already received
        let _ = response.consume().await;

        Ok(TransportResponse { status_code })
    }
}

fn classify_isahc_error(error: isahc::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}
