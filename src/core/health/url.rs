//! URL Construction Utilities for Health Probes
//!
//! Joins catalog paths onto a target's base URL and validates the result
//! before any request is built.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Normalize base URL by trimming whitespace and trailing slashes
///
/// # Examples
/// - `https://api.com/` → `https://api.com`
/// - `https://api.com///` → `https://api.com`
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a probe path onto a base URL with exactly one separating slash
///
/// # Examples
/// - `https://proxy.com` + `/v1/models` → `https://proxy.com/v1/models`
/// - `https://proxy.com/api/` + `/v1/models` → `https://proxy.com/api/v1/models`
/// - `https://proxy.com/` + `/` → `https://proxy.com/`
pub fn join_probe_url(base_url: &str, path: &str) -> String {
    let normalized = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{}/{}", normalized, path)
}

/// Build and validate the full request URL for one probe
///
/// # Returns
/// * `Ok(String)` - http(s) URL with a host
/// * `Err(UrlError)` - Unparseable URL, non-HTTP scheme or no host component
pub fn build_probe_url(base_url: &str, path: &str) -> Result<String, UrlError> {
    // Validate the base before trimming: "https://" must not turn into "https:"
    require_http_host(&Url::parse(base_url.trim())?)?;
    let joined = join_probe_url(base_url, path);
    require_http_host(&Url::parse(&joined)?)?;
    Ok(joined)
}

fn require_http_host(url: &Url) -> Result<(), UrlError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlError::MissingHost),
    }
}

/// Extract host from URL
pub fn extract_host(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str)?;
    url.host_str()
        .map(|h| h.to_string())
        .ok_or(UrlError::MissingHost)
}
