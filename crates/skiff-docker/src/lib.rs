//! Local container engine backend.
//!
//! Negotiates an Engine API version with the daemon (see [`skiff_core::negotiate`]) and
//! exposes the result as a [`skiff_core::BackendClient`] of kind
//! [`skiff_model::BackendKind::Local`].
mod client;
pub use client::{EngineConnection, LocalEngineClient};

mod config;
pub use config::{DOCKER_API_VERSION_ENV, DOCKER_HOST_ENV, LocalEngineConfig, MIN_API_VERSION};

mod factory;
pub use factory::{LocalEngineFactory, register_local_engine};

mod sdk;
pub use sdk::{BollardConnector, sdk_default_version};

mod stream;
