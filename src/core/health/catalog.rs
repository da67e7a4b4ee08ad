//! Probe catalog
//!
//! The ordered list of request shapes a cascade walks through. Order matters:
//! the cascade exits on the first 2xx, and ties during selection go to the
//! earlier entry.

use crate::core::health::types::ProbeSpec;
use std::sync::Arc;

/// Model name sent in the OpenAI-compatible completion probe
pub const COMPLETION_PROBE_MODEL: &str = "claude-3-sonnet-20240229";

/// Immutable, cheaply clonable list of probe specs
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCatalog {
    specs: Arc<[ProbeSpec]>,
}

impl ProbeCatalog {
    pub fn new(specs: Vec<ProbeSpec>) -> Self {
        Self {
            specs: specs.into(),
        }
    }

    /// Six-step catalog covering Anthropic, OpenAI-compatible and generic gateway shapes
    pub fn standard() -> Self {
        let completion_body = serde_json::json!({
            "model": COMPLETION_PROBE_MODEL,
            "messages": [{"role": "user", "content": "test"}],
            "max_tokens": 1
        });

        Self::new(vec![
            ProbeSpec::get("/v1/models", "Claude Models API"),
            ProbeSpec::post_json(
                "/v1/chat/completions",
                "OpenAI Compatible API",
                &completion_body,
            ),
            // Some gateways reject unknown headers
            ProbeSpec::get("/v1/models", "No Anthropic Version").without_version_header(),
            ProbeSpec::get("/", "Root Path"),
            ProbeSpec::get("/health", "Health Check"),
            ProbeSpec::get("/api/v1/models", "Alternative API Path"),
        ])
    }

    pub fn specs(&self) -> &[ProbeSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ProbeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
