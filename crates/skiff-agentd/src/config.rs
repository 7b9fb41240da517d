use anyhow::Context;
use skiff_docker::LocalEngineConfig;
use skiff_kube::OrchestratorConfig;
use skiff_model::{BackendKind, Flag};
use skiff_observe::LoggerConfig;

pub const BACKEND_ENV: &str = "SKIFF_BACKEND";
pub const DEBUG_ENV: &str = "SKIFF_DEBUG";
pub const FOLLOW_ENV: &str = "SKIFF_FOLLOW";

/// Everything the daemon reads from its environment, read once at startup.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub backend: BackendKind,
    /// Initial debug state of the created client.
    pub debug: Flag,
    /// Container or pod whose logs are copied to stdout until shutdown.
    pub follow: Option<String>,
    pub local: LocalEngineConfig,
    pub orchestrator: OrchestratorConfig,
}

impl AgentConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get(BACKEND_ENV) {
            Some(raw) => raw
                .parse::<BackendKind>()
                .with_context(|| format!("{BACKEND_ENV}={raw}"))?,
            None => BackendKind::Local,
        };

        Ok(Self {
            logger: LoggerConfig::from_lookup(&lookup).context("logger configuration")?,
            backend,
            debug: get(DEBUG_ENV).map(|v| Flag::from_switch(&v)).unwrap_or_default(),
            follow: get(FOLLOW_ENV).map(|v| v.trim().to_string()),
            local: LocalEngineConfig::from_lookup(&lookup),
            orchestrator: OrchestratorConfig::from_lookup(&lookup),
        })
    }
}
