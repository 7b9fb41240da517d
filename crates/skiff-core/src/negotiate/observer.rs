use skiff_model::{BackendKind, NegotiationObserver};
use tracing::{info, warn};

/// Observer that logs which negotiation path a factory took.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    backend: BackendKind,
}

impl TracingObserver {
    pub fn new(backend: BackendKind) -> Self {
        Self { backend }
    }
}

impl NegotiationObserver for TracingObserver {
    fn on_version_specified(&self, version: &str) {
        info!(backend = %self.backend, version, "using specified api version");
    }

    fn on_version_determined(&self, version: &str) {
        info!(backend = %self.backend, version, "determined api version");
    }

    fn on_using_default_version(&self, version: &str) {
        warn!(backend = %self.backend, version, "no compatible api version found, using default");
    }
}
