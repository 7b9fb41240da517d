use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Env, Labels, ModelError, ModelResult};

/// Pod-level restart policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    #[default]
    Never,
}

impl RestartPolicy {
    /// Wire spelling expected by the control plane.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "Always",
            RestartPolicy::OnFailure => "OnFailure",
            RestartPolicy::Never => "Never",
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One container of a user-supplied pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerTemplate {
    pub name: String,
    pub image: String,
    /// Entrypoint override; `None` keeps the image's entrypoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub env: Env,
}

impl ContainerTemplate {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            command: None,
            args: Vec::new(),
            env: Env::new(),
        }
    }
}

/// Fully caller-supplied pod description submitted by `launch_pod`.
///
/// Unlike a session pod nothing is derived; the control plane validates the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    pub containers: Vec<ContainerTemplate>,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl PodTemplate {
    /// Local sanity checks only: at least one container, none with a blank name or image.
    pub fn validate(&self) -> ModelResult<()> {
        if self.containers.is_empty() {
            return Err(ModelError::Invalid("pod template has no containers".into()));
        }
        for c in &self.containers {
            if c.name.trim().is_empty() {
                return Err(ModelError::Invalid("container name is empty".into()));
            }
            if c.image.trim().is_empty() {
                return Err(ModelError::Invalid(format!(
                    "container '{}' has no image",
                    c.name
                )));
            }
        }
        Ok(())
    }
}
