use crate::metrics::backend::{CallOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_negotiation(&self, _: &str, _: &str) {}

    #[inline(always)]
    fn record_call(&self, _: &str, _: &str, _: CallOutcome, _: u64) {}
}
