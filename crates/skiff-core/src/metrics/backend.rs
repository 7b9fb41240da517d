use std::sync::Arc;

use crate::error::BackendError;

/// Outcome of a single backend call for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// Call succeeded.
    Success,
    /// Engine or control plane returned an application-level error.
    Rejected,
    /// Caller input was rejected locally.
    Invalid,
    /// Caller cancelled the call.
    Cancelled,
    /// Backend unreachable.
    Connection,
}

impl CallOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            CallOutcome::Success => "success",
            CallOutcome::Rejected => "rejected",
            CallOutcome::Invalid => "invalid",
            CallOutcome::Cancelled => "cancelled",
            CallOutcome::Connection => "connection",
        }
    }

    /// Classify a call result.
    pub fn of<T>(res: &Result<T, BackendError>) -> Self {
        use crate::error::ErrorKind;

        match res {
            Ok(_) => CallOutcome::Success,
            Err(e) => match e.kind() {
                ErrorKind::Connection => CallOutcome::Connection,
                ErrorKind::Rejected => CallOutcome::Rejected,
                ErrorKind::InvalidInput => CallOutcome::Invalid,
                ErrorKind::Cancelled => CallOutcome::Cancelled,
            },
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::ClientContext`] and shared by every client a factory builds.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the result of client construction.
    ///
    /// # Arguments
    /// - `backend`: backend tag (`DOCKER`, `KUBERNETES`)
    /// - `outcome`: `specified`, `determined`, `default` or `failed`
    fn record_negotiation(&self, backend: &str, outcome: &str);
    /// Record one backend call.
    ///
    /// # Arguments
    /// - `backend`: backend tag
    /// - `op`: operation name (`logs`, `create_pod`, ...)
    /// - `outcome`: how the call ended
    /// - `duration_ms`: wall time of the call in milliseconds
    fn record_call(&self, backend: &str, op: &str, outcome: CallOutcome, duration_ms: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
