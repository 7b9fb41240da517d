use crate::Labels;

/// Control-plane view of a pod, as returned by the orchestrator variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodHandle {
    pub name: String,
    pub namespace: String,
    pub uid: Option<String>,
    pub labels: Labels,
    /// Lifecycle phase reported by the control plane (`Pending`, `Running`, ...).
    pub phase: Option<String>,
}
