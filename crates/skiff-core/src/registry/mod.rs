//! Registry that maps a [`BackendKind`] to the factory able to build it.
//!
//! Callers ask for a backend kind and receive an `Arc<dyn BackendClient>`; which
//! concrete client sits behind it is decided here, once.
use std::sync::Arc;

use skiff_model::{BackendKind, NegotiationObserver};
use tracing::{debug, instrument, warn};

use crate::{
    backend::BackendClient, context::ClientContext, error::CoreError, factory::ClientFactory,
};

/// Registry of client factories, at most one per backend kind.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: Vec<Arc<dyn ClientFactory>>,
    ctx: ClientContext,
}

impl FactoryRegistry {
    /// Create an empty registry with a default client context.
    #[inline]
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            ctx: ClientContext::default(),
        }
    }

    /// Set the context handed to every factory (metrics, initial debug state).
    #[inline]
    pub fn with_context(mut self, ctx: ClientContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Register a factory. Fails if one for the same kind is already present.
    pub fn register(&mut self, factory: Arc<dyn ClientFactory>) -> Result<(), CoreError> {
        let kind = factory.kind();
        if self.contains(kind) {
            return Err(CoreError::DuplicateFactory(kind));
        }
        self.factories.push(factory);
        Ok(())
    }

    /// Returns `true` if a factory for `kind` is registered.
    pub fn contains(&self, kind: BackendKind) -> bool {
        self.pick(kind).is_some()
    }

    pub fn pick(&self, kind: BackendKind) -> Option<&Arc<dyn ClientFactory>> {
        self.factories.iter().find(|f| f.kind() == kind)
    }

    /// Build a client for `kind`, recording the negotiation outcome in metrics.
    #[instrument(level = "debug", skip(self, observer))]
    pub async fn create(
        &self,
        kind: BackendKind,
        observer: &dyn NegotiationObserver,
    ) -> Result<Arc<dyn BackendClient>, CoreError> {
        let factory = self.pick(kind).ok_or(CoreError::NoFactory(kind))?;

        match factory.create_compatible_client(&self.ctx, observer).await {
            Ok(client) => {
                let negotiation = client.negotiation();
                self.ctx
                    .metrics()
                    .record_negotiation(kind.as_str(), negotiation.as_label());
                debug!(%negotiation, "client ready");
                Ok(client)
            }
            Err(e) => {
                self.ctx.metrics().record_negotiation(kind.as_str(), "failed");
                warn!(error = %e, "client construction failed");
                Err(e.into())
            }
        }
    }
}
