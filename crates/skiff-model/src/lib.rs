mod domain;
pub use domain::{DEFAULT_NAMESPACE, LABEL_SESSION_ID, SESSION_NAME_PREFIX};
pub use domain::{Env, Flag, KeyValue, Labels};

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::BackendKind;

mod version;
pub use version::{ApiVersion, Negotiation, NegotiationObserver, ObserverFn};

mod session;
pub use session::{ImageRef, SessionPodSpec};

mod pod;
pub use pod::{ContainerTemplate, PodHandle, PodTemplate, RestartPolicy};
