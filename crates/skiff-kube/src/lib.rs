//! Cluster orchestrator backend.
//!
//! Connects to the API server described by a kubeconfig, records the server's
//! version as the negotiation outcome and exposes pod lifecycle operations through
//! [`skiff_core::PodLifecycle`].
mod api;
pub use api::{KubePodApi, PodApi};

mod client;
pub use client::OrchestratorClient;

mod config;
pub use config::{KUBECONFIG_ENV, OrchestratorConfig, default_kubeconfig_path};

mod convert;

mod factory;
pub use factory::{OrchestratorFactory, register_orchestrator};
