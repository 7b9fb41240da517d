//! Prometheus implementation of [`skiff_core::MetricsBackend`].
//!
//! ```rust
//! use std::sync::Arc;
//! use skiff_core::{ClientContext, FactoryRegistry};
//! use skiff_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let registry = FactoryRegistry::new()
//!     .with_context(ClientContext::new(Arc::new(metrics.clone())));
//!
//! // serve `metrics.gather()` through whatever HTTP stack the binary already has
//! let _families = metrics.gather();
//! # Ok(())
//! # }
//! ```
//!
//! Exported series:
//! - `skiff_negotiations_total{backend, outcome}`
//! - `skiff_backend_calls_total{backend, op, outcome}`
//! - `skiff_backend_call_duration_seconds{backend, op}`
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
