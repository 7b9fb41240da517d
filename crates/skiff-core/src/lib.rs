pub mod backend;
pub mod context;
pub mod error;
pub mod factory;
pub mod metrics;
pub mod negotiate;
pub mod registry;

pub use backend::{BackendClient, DebugFlag, LogStream, PodLifecycle};
pub use context::ClientContext;
pub use error::{BackendError, CoreError, ErrorKind};
pub use factory::ClientFactory;
pub use metrics::{CallOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};
pub use negotiate::{Connector, TracingObserver, VersionBounds, negotiate, probe};
pub use registry::FactoryRegistry;

pub mod prelude {
    pub use crate::backend::{BackendClient, LogStream, PodLifecycle};
    pub use crate::context::ClientContext;
    pub use crate::error::{BackendError, CoreError, ErrorKind};
    pub use crate::factory::ClientFactory;
    pub use crate::registry::FactoryRegistry;
    pub use skiff_model::{BackendKind, Negotiation, NegotiationObserver};
}
