//! Backend-agnostic client handle.
//!
//! Factories hand out `Arc<dyn BackendClient>`; callers never see the concrete variant.
//! Orchestrator-only operations are reached through [`BackendClient::pods`].
mod debug;
pub use debug::DebugFlag;

use std::pin::Pin;

use async_trait::async_trait;
use skiff_model::{BackendKind, Negotiation, PodHandle, PodTemplate, SessionPodSpec};
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::error::BackendError;

/// Readable log body returned by [`BackendClient::logs`].
pub type LogStream = Pin<Box<dyn AsyncRead + Send>>;

/// Uniform operations shared by every backend variant.
///
/// Implementations are `Send + Sync` and called concurrently. The debug flag is the
/// only mutable state behind `&self`; I/O never runs while its lock is held.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Which variant this is. Fixed at construction.
    fn kind(&self) -> BackendKind;

    /// How the protocol version was settled during construction.
    fn negotiation(&self) -> &Negotiation;

    /// Fetch logs for a container (local engine) or pod (orchestrator).
    ///
    /// Returns [`BackendError::Cancelled`] promptly once `cancel` fires, without
    /// waiting for the backend to answer.
    async fn logs(&self, id: &str, cancel: CancellationToken) -> Result<LogStream, BackendError>;

    /// Toggle diagnostic tracing for subsequent operations on this client.
    fn set_debug(&self, enabled: bool);

    /// Current debug state.
    fn debug(&self) -> bool;

    /// Pod lifecycle extensions, present only on the orchestrator variant.
    fn pods(&self) -> Option<&dyn PodLifecycle> {
        None
    }
}

/// Pod lifecycle operations of the orchestrator variant.
///
/// All calls are single request/response passthroughs; control-plane errors surface
/// as [`BackendError::Rejected`] with the status code preserved.
#[async_trait]
pub trait PodLifecycle: Send + Sync {
    /// Submit a caller-supplied pod under `name`.
    async fn launch_pod(
        &self,
        name: &str,
        template: &PodTemplate,
    ) -> Result<PodHandle, BackendError>;

    /// Derive a session pod from `image` and submit it.
    ///
    /// Fails with [`BackendError::InvalidInput`] before any I/O when `image` is not
    /// `<name>:<browser>_<version>`.
    async fn create_session_pod(
        &self,
        request_id: &str,
        image: &str,
    ) -> Result<PodHandle, BackendError>;

    /// Submit an already-derived session pod.
    async fn create_pod(&self, spec: &SessionPodSpec) -> Result<PodHandle, BackendError>;

    async fn delete_pod_by_name(&self, name: &str) -> Result<(), BackendError>;

    async fn get_pod_by_name(&self, name: &str) -> Result<PodHandle, BackendError>;

    /// Find the pod whose session-id label equals `session_id`.
    async fn get_pod_by_session_id(&self, session_id: &str) -> Result<PodHandle, BackendError>;

    /// Bind `session_id` to pod `name`.
    ///
    /// Fails with [`BackendError::SessionConflict`] if the pod already carries a session
    /// id, including the same one. Concurrent callers in this process are serialized;
    /// other processes are not.
    async fn add_session_id(&self, name: &str, session_id: &str) -> Result<(), BackendError>;
}
