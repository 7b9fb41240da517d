use crate::{
    DEFAULT_NAMESPACE, ImageRef, Labels, ModelError, ModelResult, RestartPolicy,
    SESSION_NAME_PREFIX,
};

/// Longest name the control plane accepts for a container.
const MAX_CONTAINER_NAME: usize = 63;

/// Declarative launch request for a single browser session pod.
///
/// Built from a request id and an image reference; once submitted the control plane
/// owns the pod and no local copy is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPodSpec {
    pub namespace: String,
    pub generate_name: String,
    pub container_name: String,
    pub image: ImageRef,
    pub restart_policy: RestartPolicy,
    pub labels: Labels,
}

impl SessionPodSpec {
    /// Derive a session pod for `request_id` running `image`.
    ///
    /// The container is named `req-{id}-brow-{browser}-ver-{major}-{minor}`. The request id
    /// is lowercased and may only hold ASCII letters, digits and `-`.
    pub fn build(request_id: &str, image: &str) -> ModelResult<Self> {
        let image = ImageRef::parse(image)?;
        let request_id = request_id.trim();
        if request_id.is_empty() {
            return Err(ModelError::EmptyRequestId);
        }
        let invalid = |reason: &str| ModelError::InvalidRequestId {
            id: request_id.to_string(),
            reason: reason.to_string(),
        };
        if !request_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(invalid("only letters, digits and '-' are allowed"));
        }
        let request_id = request_id.to_ascii_lowercase();

        let (major, minor) = image.version_parts();
        let container_name = format!(
            "req-{request_id}-brow-{browser}-ver-{major}-{minor}",
            browser = image.browser(),
        );
        if container_name.len() > MAX_CONTAINER_NAME {
            return Err(invalid(&format!(
                "container name '{container_name}' exceeds {MAX_CONTAINER_NAME} characters"
            )));
        }

        Ok(Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            generate_name: SESSION_NAME_PREFIX.to_string(),
            container_name,
            image,
            restart_policy: RestartPolicy::Never,
            labels: Labels::new(),
        })
    }
}
