//! Metrics collection abstraction for backend clients.
//!
//! Metrics backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected via [`crate::ClientContext`].
mod backend;
pub use backend::{CallOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::{future::Future, sync::Arc, time::Instant};

use skiff_model::BackendKind;

use crate::error::BackendError;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

/// Await `fut` and record its outcome and duration under `op`.
pub async fn timed<T, F>(
    metrics: &MetricsHandle,
    backend: BackendKind,
    op: &'static str,
    fut: F,
) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    let started = Instant::now();
    let res = fut.await;
    let elapsed = started.elapsed().as_millis() as u64;
    metrics.record_call(backend.as_str(), op, CallOutcome::of(&res), elapsed);
    res
}
