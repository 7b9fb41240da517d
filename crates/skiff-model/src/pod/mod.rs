//! Backend-agnostic pod shapes exchanged with the orchestrator variant.
mod template;
pub use template::{ContainerTemplate, PodTemplate, RestartPolicy};

mod handle;
pub use handle::PodHandle;
