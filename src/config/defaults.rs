// Default health check settings
use super::types::HealthSettings;
use crate::core::health::{DEFAULT_CONCURRENCY, DEFAULT_PROBE_TIMEOUT};

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            concurrency: DEFAULT_CONCURRENCY,
            probes: Vec::new(), // standard catalog
        }
    }
}
