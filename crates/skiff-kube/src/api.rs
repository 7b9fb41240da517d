use async_trait::async_trait;
use futures::AsyncReadExt;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client,
    api::{DeleteParams, ListParams, LogParams, PostParams},
};
use skiff_core::BackendError;

/// Namespaced pod operations against the control plane.
///
/// One call per method, no retries. Errors are already mapped: API answers become
/// [`BackendError::Rejected`] with their status code, everything else is a
/// [`BackendError::Connection`].
#[async_trait]
pub trait PodApi: Send + Sync + 'static {
    /// Namespace every call targets.
    fn namespace(&self) -> &str;

    async fn create(&self, pod: &Pod) -> Result<Pod, BackendError>;

    async fn get(&self, name: &str) -> Result<Pod, BackendError>;

    async fn replace(&self, name: &str, pod: &Pod) -> Result<Pod, BackendError>;

    async fn delete(&self, name: &str) -> Result<(), BackendError>;

    /// Full log body of the pod's (single) container, raw bytes.
    async fn logs(&self, name: &str) -> Result<Vec<u8>, BackendError>;

    /// Pods matching a label selector such as `session-id=abc`.
    async fn list(&self, selector: &str) -> Result<Vec<Pod>, BackendError>;
}

/// [`PodApi`] over a live `kube` client.
#[derive(Clone)]
pub struct KubePodApi {
    api: Api<Pod>,
    namespace: String,
}

impl KubePodApi {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait]
impl PodApi for KubePodApi {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create(&self, pod: &Pod) -> Result<Pod, BackendError> {
        self.api
            .create(&PostParams::default(), pod)
            .await
            .map_err(map_kube_error)
    }

    async fn get(&self, name: &str) -> Result<Pod, BackendError> {
        self.api.get(name).await.map_err(map_kube_error)
    }

    async fn replace(&self, name: &str, pod: &Pod) -> Result<Pod, BackendError> {
        self.api
            .replace(name, &PostParams::default(), pod)
            .await
            .map_err(map_kube_error)
    }

    async fn delete(&self, name: &str) -> Result<(), BackendError> {
        self.api
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(map_kube_error)
    }

    async fn logs(&self, name: &str) -> Result<Vec<u8>, BackendError> {
        // `Api::logs` decodes as UTF-8 and fails on any other byte.
        let stream = self
            .api
            .log_stream(name, &LogParams::default())
            .await
            .map_err(map_kube_error)?;
        let mut stream = std::pin::pin!(stream);
        let mut body = Vec::new();
        stream
            .read_to_end(&mut body)
            .await
            .map_err(|e| BackendError::Connection(format!("reading logs of {name}: {e}")))?;
        Ok(body)
    }

    async fn list(&self, selector: &str) -> Result<Vec<Pod>, BackendError> {
        let params = ListParams::default().labels(selector);
        self.api
            .list(&params)
            .await
            .map(|list| list.items)
            .map_err(map_kube_error)
    }
}

pub(crate) fn map_kube_error(err: kube::Error) -> BackendError {
    match err {
        kube::Error::Api(resp) => BackendError::rejected(Some(resp.code), resp.message),
        other => BackendError::Connection(other.to_string()),
    }
}
