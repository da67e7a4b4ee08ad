//! Endpoint Health Probing Module
//!
//! Decides whether a configured API backend is reachable:
//! - `probe`: one request, one classified outcome
//! - `cascade`: ordered probing with early exit and evidence ranking
//! - `runner`: concurrent batch evaluation with cancellation
//! - `transport`: the network seam, isahc in production and fakes in tests

pub mod cascade;
pub mod catalog;
pub mod probe;
pub mod runner;
pub mod transport;
pub mod types;
pub mod url;

// Re-export public API
pub use cascade::{build_verdict, rank, select_best, CascadeEvaluator, ScanResult};
pub use catalog::ProbeCatalog;
pub use probe::{Prober, ANTHROPIC_VERSION, DEFAULT_PROBE_TIMEOUT};
pub use runner::{cancel_pair, CancelHandle, CancelSignal, HealthChecker, DEFAULT_CONCURRENCY};
pub use transport::{IsahcTransport, ProbeRequest, ProbeTransport, TransportError, TransportResponse};
pub use types::*;
