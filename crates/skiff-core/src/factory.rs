use std::sync::Arc;

use async_trait::async_trait;
use skiff_model::{BackendKind, NegotiationObserver};

use crate::{backend::BackendClient, context::ClientContext, error::BackendError};

/// Builds a live, version-negotiated client for one backend.
///
/// Contract:
/// - on success exactly one observer callback has fired, matching
///   [`BackendClient::negotiation`] of the returned client;
/// - on failure no client exists and no callback has fired.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Backend variant produced by this factory.
    fn kind(&self) -> BackendKind;

    async fn create_compatible_client(
        &self,
        ctx: &ClientContext,
        observer: &dyn NegotiationObserver,
    ) -> Result<Arc<dyn BackendClient>, BackendError>;
}
