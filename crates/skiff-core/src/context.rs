use std::fmt;

use skiff_model::Flag;

use crate::metrics::MetricsHandle;

/// Shared dependencies handed to every client factory.
#[derive(Clone)]
pub struct ClientContext {
    metrics: MetricsHandle,
    debug: Flag,
}

impl ClientContext {
    pub fn new(metrics: MetricsHandle) -> Self {
        Self {
            metrics,
            debug: Flag::disabled(),
        }
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Debug state new clients start with.
    pub fn debug(&self) -> Flag {
        self.debug
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the initial debug state and return updated context.
    pub fn with_debug(mut self, debug: impl Into<Flag>) -> Self {
        self.debug = debug.into();
        self
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(crate::metrics::noop_metrics())
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("metrics", &"<handle>")
            .field("debug", &self.debug.is_enabled())
            .finish()
    }
}
