//! Batch health checking across targets
//!
//! Targets are independent, so their cascades run concurrently up to a worker
//! limit. Each cascade stays sequential internally. Reports come back in input
//! order. On cancellation, unfinished cascades are dropped (aborting their
//! in-flight requests) and reported as `Cancelled`.

use crate::core::debug_logger::get_debug_logger;
use crate::core::health::cascade::CascadeEvaluator;
use crate::core::health::types::{BackendTarget, TargetReport};
use futures::stream::{self, StreamExt};
use tokio::sync::watch;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Trigger side of a cancellation pair
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a cancellation pair
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Signal that never fires
    pub fn never() -> Self {
        let (_, signal) = cancel_pair();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation was requested; pends forever if the handle is gone
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

/// Evaluates many targets with bounded concurrency
#[derive(Clone)]
pub struct HealthChecker {
    evaluator: CascadeEvaluator,
    concurrency: usize,
}

impl HealthChecker {
    pub fn new(evaluator: CascadeEvaluator) -> Self {
        Self {
            evaluator,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Worker limit; values below 1 are raised to 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// One report per target, in input order
    pub async fn check_all(
        &self,
        targets: Vec<BackendTarget>,
        cancel: CancelSignal,
    ) -> Vec<TargetReport> {
        stream::iter(targets)
            .map(|target| {
                let cancel = cancel.clone();
                async move { self.check_one(target, cancel).await }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Evaluate one target unless cancellation wins first
    pub async fn check_one(&self, target: BackendTarget, mut cancel: CancelSignal) -> TargetReport {
        if cancel.is_cancelled() {
            get_debug_logger().target_cancelled(&target.name);
            return TargetReport::Cancelled { target };
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                get_debug_logger().target_cancelled(&target.name);
                TargetReport::Cancelled { target: target.clone() }
            }
            verdict = self.evaluator.evaluate(&target) => TargetReport::Completed(verdict),
        }
    }
}
