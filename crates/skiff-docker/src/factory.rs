use std::sync::Arc;

use async_trait::async_trait;
use skiff_core::{
    BackendClient, BackendError, ClientContext, ClientFactory, Connector, CoreError,
    FactoryRegistry, negotiate,
};
use skiff_model::{BackendKind, NegotiationObserver};
use tracing::{debug, instrument};

use crate::{client::EngineConnection, config::LocalEngineConfig, sdk::BollardConnector};

/// Builds [`crate::LocalEngineClient`]s after negotiating an Engine API version.
pub struct LocalEngineFactory<K = BollardConnector> {
    connector: K,
    config: LocalEngineConfig,
}

impl LocalEngineFactory<BollardConnector> {
    pub fn new(config: LocalEngineConfig) -> Self {
        let connector = BollardConnector::new(config.host.clone());
        Self { connector, config }
    }
}

impl<K> LocalEngineFactory<K>
where
    K: Connector,
    K::Connection: EngineConnection,
{
    /// Use a custom connector instead of the SDK one.
    pub fn with_connector(connector: K, config: LocalEngineConfig) -> Self {
        Self { connector, config }
    }
}

#[async_trait]
impl<K> ClientFactory for LocalEngineFactory<K>
where
    K: Connector,
    K::Connection: EngineConnection,
{
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    #[instrument(level = "debug", skip_all, fields(backend = %BackendKind::Local))]
    async fn create_compatible_client(
        &self,
        ctx: &ClientContext,
        observer: &dyn NegotiationObserver,
    ) -> Result<Arc<dyn BackendClient>, BackendError> {
        let (conn, negotiation) = negotiate(
            &self.connector,
            self.config.api_version.as_deref(),
            self.config.bounds(),
        )
        .await?;
        debug!(%negotiation, "engine connection negotiated");

        let client = crate::LocalEngineClient::new(
            conn,
            negotiation.clone(),
            ctx.debug(),
            Arc::clone(ctx.metrics()),
        );
        negotiation.notify(observer);
        Ok(Arc::new(client))
    }
}

/// Register the SDK-backed local engine factory.
pub fn register_local_engine(
    registry: &mut FactoryRegistry,
    config: LocalEngineConfig,
) -> Result<(), CoreError> {
    registry.register(Arc::new(LocalEngineFactory::new(config)))
}
