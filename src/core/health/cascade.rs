//! Cascade Evaluation
//!
//! Walks a probe catalog against one target and turns the collected evidence
//! into a verdict. Two explicit phases:
//!
//! 1. **Scan**: fire specs in catalog order, stopping right after the first 2xx.
//! 2. **Select**: when no 2xx was seen, rank every outcome with a total order
//!    and keep the best one.

use crate::core::debug_logger::get_debug_logger;
use crate::core::health::catalog::ProbeCatalog;
use crate::core::health::probe::Prober;
use crate::core::health::types::{BackendTarget, HealthVerdict, ProbeOutcome};
use std::cmp::Ordering;

/// Evidence gathered by the scan phase
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// One outcome per spec fired, in catalog order
    pub outcomes: Vec<ProbeOutcome>,
    /// Index into `outcomes` of the 2xx that ended the scan
    pub success_index: Option<usize>,
}

/// Runs the cascade for one target at a time
#[derive(Clone)]
pub struct CascadeEvaluator {
    prober: Prober,
    catalog: ProbeCatalog,
}

impl CascadeEvaluator {
    pub fn new(prober: Prober, catalog: ProbeCatalog) -> Self {
        Self { prober, catalog }
    }

    pub fn catalog(&self) -> &ProbeCatalog {
        &self.catalog
    }

    /// Probe `target` through the catalog and produce its verdict
    pub async fn evaluate(&self, target: &BackendTarget) -> HealthVerdict {
        let scan = self.scan(target).await;
        let verdict = build_verdict(target, scan);

        get_debug_logger().cascade_complete(
            &target.name,
            verdict.healthy,
            verdict.status_code(),
            verdict.tried_specs.len(),
            &verdict.endpoint_label(),
        );

        verdict
    }

    /// Phase 1: sequential probing with early exit on the first 2xx
    pub async fn scan(&self, target: &BackendTarget) -> ScanResult {
        let mut outcomes = Vec::with_capacity(self.catalog.len());

        for spec in self.catalog.specs() {
            let outcome = self
                .prober
                .probe_for(&target.name, &target.base_url, &target.auth_token, spec)
                .await;
            let success = outcome.is_success();
            outcomes.push(outcome);

            if success {
                return ScanResult {
                    success_index: Some(outcomes.len() - 1),
                    outcomes,
                };
            }
        }

        ScanResult {
            outcomes,
            success_index: None,
        }
    }
}

/// Turn scan evidence into a verdict, running selection when no 2xx was seen
pub fn build_verdict(target: &BackendTarget, scan: ScanResult) -> HealthVerdict {
    let chosen_index = scan.success_index.or_else(|| select_best(&scan.outcomes));
    let tried_specs = scan.outcomes.iter().map(|o| o.spec.clone()).collect();
    let chosen_outcome = chosen_index.and_then(|i| scan.outcomes.into_iter().nth(i));

    HealthVerdict {
        target: target.clone(),
        healthy: chosen_outcome.as_ref().is_some_and(ProbeOutcome::ok),
        chosen_outcome,
        tried_specs,
    }
}

/// Phase 2: index of the best outcome, or None for an empty slice
///
/// The first rule that discriminates wins:
/// 1. reachable (`ok`) beats not reachable
/// 2. any status beats no status
/// 3. the lower status code wins, even across unrelated endpoints
/// 4. the earlier catalog position wins
///
/// Rule 3 treats lower codes as closer to success (401 over 404, 404 over 500).
/// Reports depend on this exact order.
pub fn select_best(outcomes: &[ProbeOutcome]) -> Option<usize> {
    outcomes
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| rank(a, b).then(ia.cmp(ib)))
        .map(|(index, _)| index)
}

/// `Less` means `a` is the better evidence
pub fn rank(a: &ProbeOutcome, b: &ProbeOutcome) -> Ordering {
    b.ok()
        .cmp(&a.ok())
        .then_with(|| match (a.status_code, b.status_code) {
            (Some(sa), Some(sb)) => sa.cmp(&sb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
