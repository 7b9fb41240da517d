//! Well-known names shared by the orchestrator backend and its callers.
//!
//! Keeping them here avoids scattering magic strings across crates.

/// Label key holding the broker session id bound to a pod.
///
/// Written once by `add_session_id` and used as a selector by `get_pod_by_session_id`.
/// A pod carrying a non-empty value under this key is considered claimed.
pub const LABEL_SESSION_ID: &str = "session-id";

/// Namespace every session pod is created in.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Prefix handed to the control plane for generated session pod names.
pub const SESSION_NAME_PREFIX: &str = "session-";
