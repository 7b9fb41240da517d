mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use skiff_core::{BackendClient, BackendError, ClientContext, FactoryRegistry, TracingObserver};
use skiff_docker::register_local_engine;
use skiff_kube::register_orchestrator;
use skiff_observe::{init_local_offset, init_logger};
use skiff_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

fn main() -> anyhow::Result<()> {
    // must run before the runtime spawns worker threads
    init_local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    // 1) config + logger
    let cfg = AgentConfig::from_env()?;
    init_logger(&cfg.logger)?;
    info!(backend = %cfg.backend, "logger initialized");

    // 2) registry with both backends
    let metrics = PrometheusMetrics::new()?;
    let ctx = ClientContext::new(Arc::new(metrics.clone())).with_debug(cfg.debug);
    let mut registry = FactoryRegistry::new().with_context(ctx);
    register_local_engine(&mut registry, cfg.local.clone())?;
    register_orchestrator(&mut registry, cfg.orchestrator.clone())?;

    // 3) negotiated client
    let client = registry
        .create(cfg.backend, &TracingObserver::new(cfg.backend))
        .await
        .with_context(|| format!("creating {} client", cfg.backend))?;
    info!(
        kind = %client.kind(),
        negotiation = %client.negotiation(),
        pods = client.pods().is_some(),
        "client ready"
    );

    // 4) optional log follow, until ctrl-c
    let shutdown = CancellationToken::new();
    let follow = cfg
        .follow
        .clone()
        .map(|id| tokio::spawn(follow_logs(Arc::clone(&client), id, shutdown.child_token())));

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    shutdown.cancel();

    if let Some(handle) = follow {
        if let Err(e) = handle.await? {
            warn!(error = %e, "log follow ended with error");
        }
    }
    Ok(())
}

async fn follow_logs(
    client: Arc<dyn BackendClient>,
    id: String,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut body = client.logs(&id, cancel).await?;
    let mut stdout = tokio::io::stdout();
    match tokio::io::copy(&mut body, &mut stdout).await {
        Ok(bytes) => info!(id = %id, bytes, "log stream finished"),
        Err(e) if matches!(BackendError::from_io(&e), Some(BackendError::Cancelled)) => {
            info!(id = %id, "log follow cancelled")
        }
        Err(e) => return Err(e.into()),
    }
    stdout.flush().await?;
    Ok(())
}
