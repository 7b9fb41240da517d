use std::sync::Arc;

use async_trait::async_trait;
use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use skiff_core::{
    BackendClient, BackendError, ClientContext, ClientFactory, CoreError, FactoryRegistry,
};
use skiff_model::{BackendKind, Negotiation, NegotiationObserver};
use tracing::{debug, instrument};

use crate::{api::KubePodApi, client::OrchestratorClient, config::OrchestratorConfig};

/// Builds [`OrchestratorClient`]s from a kubeconfig.
///
/// The API server picks its own version; the factory only asks which one it got,
/// so the outcome is always [`Negotiation::Determined`].
pub struct OrchestratorFactory {
    config: OrchestratorConfig,
}

impl OrchestratorFactory {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

/// Load credentials, build a client and ask the server for its version.
async fn connect(config: &OrchestratorConfig) -> Result<(Client, String), BackendError> {
    let path = config.kubeconfig.display();
    let kubeconfig = Kubeconfig::read_from(&config.kubeconfig)
        .map_err(|e| BackendError::Connection(format!("reading kubeconfig {path}: {e}")))?;
    let cfg = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| BackendError::Connection(format!("loading kubeconfig {path}: {e}")))?;
    let client = Client::try_from(cfg)
        .map_err(|e| BackendError::Connection(format!("building api client: {e}")))?;

    let info = client
        .apiserver_version()
        .await
        .map_err(|e| BackendError::Connection(format!("server version discovery: {e}")))?;
    Ok((client, info.git_version))
}

#[async_trait]
impl ClientFactory for OrchestratorFactory {
    fn kind(&self) -> BackendKind {
        BackendKind::Orchestrator
    }

    #[instrument(level = "debug", skip_all, fields(backend = %BackendKind::Orchestrator, namespace = %self.config.namespace))]
    async fn create_compatible_client(
        &self,
        ctx: &ClientContext,
        observer: &dyn NegotiationObserver,
    ) -> Result<Arc<dyn BackendClient>, BackendError> {
        let (client, version) = connect(&self.config).await?;
        debug!(%version, "api server reachable");

        let negotiation = Negotiation::Determined(version);
        let client = OrchestratorClient::new(
            KubePodApi::new(client, &self.config.namespace),
            negotiation.clone(),
            ctx.debug(),
            Arc::clone(ctx.metrics()),
        );
        negotiation.notify(observer);
        Ok(Arc::new(client))
    }
}

/// Register the kube-backed orchestrator factory.
pub fn register_orchestrator(
    registry: &mut FactoryRegistry,
    config: OrchestratorConfig,
) -> Result<(), CoreError> {
    registry.register(Arc::new(OrchestratorFactory::new(config)))
}
