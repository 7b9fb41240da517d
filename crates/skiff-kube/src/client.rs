use std::io::Cursor;

use async_trait::async_trait;
use skiff_core::{
    BackendClient, BackendError, DebugFlag, LogStream, MetricsHandle, PodLifecycle, metrics::timed,
};
use skiff_model::{
    BackendKind, Flag, LABEL_SESSION_ID, Labels, Negotiation, PodHandle, PodTemplate,
    SessionPodSpec,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{api::PodApi, convert};

const BACKEND: BackendKind = BackendKind::Orchestrator;

/// Client for the cluster orchestrator.
///
/// Logs are fetched in full and handed back as an in-memory reader; unlike the
/// local engine nothing is streamed.
pub struct OrchestratorClient<P> {
    pods: P,
    negotiation: Negotiation,
    debug: DebugFlag,
    session_lock: Mutex<()>,
    metrics: MetricsHandle,
}

impl<P: PodApi> OrchestratorClient<P> {
    pub fn new(pods: P, negotiation: Negotiation, debug: Flag, metrics: MetricsHandle) -> Self {
        Self {
            pods,
            negotiation,
            debug: DebugFlag::new(debug),
            session_lock: Mutex::new(()),
            metrics,
        }
    }

    fn trace(&self, op: &'static str, subject: &str) {
        if self.debug.get() {
            info!(target: "skiff::debug", backend = %BACKEND, op, id = subject, "orchestrator call");
        }
    }

    async fn fetch_logs(
        &self,
        name: &str,
        cancel: CancellationToken,
    ) -> Result<LogStream, BackendError> {
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BackendError::Cancelled),
            body = self.pods.logs(name) => body?,
        };
        Ok(Box::pin(Cursor::new(body)))
    }

    async fn submit_session(&self, spec: &SessionPodSpec) -> Result<PodHandle, BackendError> {
        let created = self.pods.create(&convert::session_pod(spec)).await?;
        Ok(convert::handle(created))
    }

    async fn bind_session(&self, name: &str, session_id: &str) -> Result<(), BackendError> {
        // An empty label reads as unset, so a blank id would leave the pod unclaimed.
        if session_id.trim().is_empty() {
            return Err(BackendError::InvalidInput("session id is empty".into()));
        }
        let _guard = self.session_lock.lock().await;

        let mut pod = self.pods.get(name).await?;
        let mut labels = Labels::from(pod.metadata.labels.take().unwrap_or_default());
        if labels.get_non_empty(LABEL_SESSION_ID).is_some() {
            return Err(BackendError::SessionConflict {
                pod: name.to_string(),
                label: LABEL_SESSION_ID.to_string(),
            });
        }
        labels.insert(LABEL_SESSION_ID, session_id);
        pod.metadata.labels = Some(labels.into());

        self.pods.replace(name, &pod).await?;
        debug!(pod = name, session_id, "session bound to pod");
        Ok(())
    }
}

#[async_trait]
impl<P: PodApi> BackendClient for OrchestratorClient<P> {
    fn kind(&self) -> BackendKind {
        if self.debug.get() {
            info!(target: "skiff::debug", "kind requested");
        }
        BACKEND
    }

    fn negotiation(&self) -> &Negotiation {
        &self.negotiation
    }

    async fn logs(&self, id: &str, cancel: CancellationToken) -> Result<LogStream, BackendError> {
        self.trace("logs", id);
        timed(&self.metrics, BACKEND, "logs", self.fetch_logs(id, cancel)).await
    }

    fn set_debug(&self, enabled: bool) {
        let was = self.debug.set(enabled);
        if enabled && !was {
            info!(target: "skiff::debug", backend = %BACKEND, "debug enabled");
        }
    }

    fn debug(&self) -> bool {
        self.debug.get()
    }

    fn pods(&self) -> Option<&dyn PodLifecycle> {
        Some(self)
    }
}

#[async_trait]
impl<P: PodApi> PodLifecycle for OrchestratorClient<P> {
    async fn launch_pod(
        &self,
        name: &str,
        template: &PodTemplate,
    ) -> Result<PodHandle, BackendError> {
        self.trace("launch_pod", name);
        let fut = async {
            template.validate()?;
            let pod = convert::template_pod(name, self.pods.namespace(), template);
            Ok::<_, BackendError>(convert::handle(self.pods.create(&pod).await?))
        };
        timed(&self.metrics, BACKEND, "launch_pod", fut).await
    }

    async fn create_session_pod(
        &self,
        request_id: &str,
        image: &str,
    ) -> Result<PodHandle, BackendError> {
        self.trace("create_session_pod", request_id);
        let fut = async {
            let mut spec = SessionPodSpec::build(request_id, image)?;
            spec.namespace = self.pods.namespace().to_string();
            self.submit_session(&spec).await
        };
        timed(&self.metrics, BACKEND, "create_pod", fut).await
    }

    async fn create_pod(&self, spec: &SessionPodSpec) -> Result<PodHandle, BackendError> {
        self.trace("create_pod", &spec.container_name);
        timed(&self.metrics, BACKEND, "create_pod", self.submit_session(spec)).await
    }

    async fn delete_pod_by_name(&self, name: &str) -> Result<(), BackendError> {
        self.trace("delete_pod", name);
        timed(&self.metrics, BACKEND, "delete_pod", self.pods.delete(name)).await
    }

    async fn get_pod_by_name(&self, name: &str) -> Result<PodHandle, BackendError> {
        self.trace("get_pod", name);
        let fut = async { Ok::<_, BackendError>(convert::handle(self.pods.get(name).await?)) };
        timed(&self.metrics, BACKEND, "get_pod", fut).await
    }

    async fn get_pod_by_session_id(&self, session_id: &str) -> Result<PodHandle, BackendError> {
        self.trace("find_pod", session_id);
        let fut = async {
            if session_id.trim().is_empty() {
                return Err(BackendError::InvalidInput("session id is empty".into()));
            }
            let selector = format!("{LABEL_SESSION_ID}={session_id}");
            let found = self.pods.list(&selector).await?.into_iter().next();
            found.map(convert::handle).ok_or_else(|| {
                BackendError::rejected(Some(404), format!("no pod with {selector}"))
            })
        };
        timed(&self.metrics, BACKEND, "find_pod", fut).await
    }

    async fn add_session_id(&self, name: &str, session_id: &str) -> Result<(), BackendError> {
        self.trace("add_session_id", name);
        timed(
            &self.metrics,
            BACKEND,
            "add_session_id",
            self.bind_session(name, session_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use k8s_openapi::api::core::v1::Pod;
    use skiff_core::{ErrorKind, noop_metrics};
    use tokio::io::AsyncReadExt;

    use super::*;

    /// In-memory control plane. Pods named `hang-*` never answer log requests.
    #[derive(Default)]
    struct FakePods {
        pods: std::sync::Mutex<BTreeMap<String, Pod>>,
        logs: BTreeMap<String, Vec<u8>>,
        seq: AtomicUsize,
        creates: AtomicUsize,
    }

    impl FakePods {
        fn with_pod(self, name: &str, labels: &[(&str, &str)]) -> Self {
            let mut pod = Pod::default();
            pod.metadata.name = Some(name.to_string());
            pod.metadata.namespace = Some("default".to_string());
            if !labels.is_empty() {
                pod.metadata.labels = Some(
                    labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                );
            }
            self.pods.lock().unwrap().insert(name.to_string(), pod);
            self
        }

        fn with_logs(mut self, name: &str, body: &[u8]) -> Self {
            self.logs.insert(name.to_string(), body.to_vec());
            self
        }

        fn label(&self, name: &str) -> Option<String> {
            let pods = self.pods.lock().unwrap();
            pods.get(name)?
                .metadata
                .labels
                .as_ref()?
                .get(LABEL_SESSION_ID)
                .cloned()
        }
    }

    fn not_found(name: &str) -> BackendError {
        BackendError::rejected(Some(404), format!("pods \"{name}\" not found"))
    }

    #[async_trait]
    impl PodApi for Arc<FakePods> {
        fn namespace(&self) -> &str {
            "default"
        }

        async fn create(&self, pod: &Pod) -> Result<Pod, BackendError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut pod = pod.clone();
            let name = match (&pod.metadata.name, &pod.metadata.generate_name) {
                (Some(name), _) => name.clone(),
                (None, Some(prefix)) => {
                    format!("{prefix}{}", self.seq.fetch_add(1, Ordering::SeqCst))
                }
                (None, None) => return Err(BackendError::rejected(Some(422), "name required")),
            };
            let mut pods = self.pods.lock().unwrap();
            if pods.contains_key(&name) {
                return Err(BackendError::rejected(Some(409), "already exists"));
            }
            pod.metadata.name = Some(name.clone());
            pod.metadata.uid = Some(format!("uid-{name}"));
            pods.insert(name, pod.clone());
            Ok(pod)
        }

        async fn get(&self, name: &str) -> Result<Pod, BackendError> {
            let pods = self.pods.lock().unwrap();
            pods.get(name).cloned().ok_or_else(|| not_found(name))
        }

        async fn replace(&self, name: &str, pod: &Pod) -> Result<Pod, BackendError> {
            let mut pods = self.pods.lock().unwrap();
            let slot = pods.get_mut(name).ok_or_else(|| not_found(name))?;
            *slot = pod.clone();
            Ok(pod.clone())
        }

        async fn delete(&self, name: &str) -> Result<(), BackendError> {
            let mut pods = self.pods.lock().unwrap();
            pods.remove(name).map(|_| ()).ok_or_else(|| not_found(name))
        }

        async fn logs(&self, name: &str) -> Result<Vec<u8>, BackendError> {
            if name.starts_with("hang-") {
                std::future::pending::<()>().await;
            }
            self.logs.get(name).cloned().ok_or_else(|| not_found(name))
        }

        async fn list(&self, selector: &str) -> Result<Vec<Pod>, BackendError> {
            let (key, value) = selector.split_once('=').unwrap();
            let pods = self.pods.lock().unwrap();
            Ok(pods
                .values()
                .filter(|p| {
                    p.metadata
                        .labels
                        .as_ref()
                        .and_then(|l| l.get(key))
                        .is_some_and(|v| v == value)
                })
                .cloned()
                .collect())
        }
    }

    fn client(fake: &Arc<FakePods>) -> OrchestratorClient<Arc<FakePods>> {
        OrchestratorClient::new(
            Arc::clone(fake),
            Negotiation::Determined("v1.30.2".into()),
            Flag::disabled(),
            noop_metrics(),
        )
    }

    #[tokio::test]
    async fn second_session_id_conflicts_and_keeps_the_first() {
        let fake = Arc::new(FakePods::default().with_pod("session-0", &[]));
        let c = client(&fake);

        c.add_session_id("session-0", "s-1").await.unwrap();
        let err = c.add_session_id("session-0", "s-2").await.unwrap_err();

        assert!(matches!(err, BackendError::SessionConflict { .. }), "got {err:?}");
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(fake.label("session-0").as_deref(), Some("s-1"));
    }

    #[tokio::test]
    async fn same_session_id_twice_also_conflicts() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[(LABEL_SESSION_ID, "s-1")]));
        let c = client(&fake);

        let err = c.add_session_id("p", "s-1").await.unwrap_err();
        assert!(matches!(err, BackendError::SessionConflict { .. }));
    }

    #[tokio::test]
    async fn other_labels_survive_binding() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[("team", "qa")]));
        let c = client(&fake);

        c.add_session_id("p", "s-9").await.unwrap();
        let pod = c.get_pod_by_name("p").await.unwrap();
        assert_eq!(pod.labels.get("team"), Some("qa"));
        assert_eq!(pod.labels.get(LABEL_SESSION_ID), Some("s-9"));
    }

    #[tokio::test]
    async fn concurrent_binders_have_one_winner() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[]));
        let c = Arc::new(client(&fake));

        let mut handles = Vec::new();
        for i in 0..8 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(async move {
                c.add_session_id("p", &format!("s-{i}")).await
            }));
        }
        let mut ok = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn blank_session_id_is_rejected_before_any_call() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[]));
        let c = client(&fake);

        for blank in ["", "  "] {
            let err = c.add_session_id("p", blank).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert_eq!(fake.label("p"), None);

        // nothing was claimed, so a real id still binds
        c.add_session_id("p", "s-1").await.unwrap();
        assert_eq!(fake.label("p").as_deref(), Some("s-1"));
    }

    #[tokio::test]
    async fn empty_label_counts_as_unclaimed() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[(LABEL_SESSION_ID, "")]));
        let c = client(&fake);

        c.add_session_id("p", "s-1").await.unwrap();
        assert_eq!(fake.label("p").as_deref(), Some("s-1"));
    }

    #[tokio::test]
    async fn binding_a_missing_pod_is_not_found() {
        let fake = Arc::new(FakePods::default());
        let err = client(&fake).add_session_id("ghost", "s").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_image_never_reaches_the_control_plane() {
        let fake = Arc::new(FakePods::default());
        let c = client(&fake);

        let err = c.create_session_pod("req-1", "myimage").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = c.create_session_pod("req_1", "myimage:chrome_70").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(fake.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn session_pod_gets_generated_name_and_derived_container() {
        let fake = Arc::new(FakePods::default());
        let c = client(&fake);

        let handle = c.create_session_pod("req-1", "myimage:chrome_70").await.unwrap();
        assert!(handle.name.starts_with("session-"), "got {}", handle.name);
        assert_eq!(handle.namespace, "default");

        let pod = fake.get(&handle.name).await.unwrap();
        let container = &pod.spec.unwrap().containers[0];
        assert!(container.name.contains("req-1"));
        assert!(container.name.contains("chrome"));
        assert!(container.name.contains("70"));
    }

    #[tokio::test]
    async fn launch_pod_validates_then_submits() {
        let fake = Arc::new(FakePods::default());
        let c = client(&fake);

        let err = c.launch_pod("grid", &PodTemplate::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let template = PodTemplate {
            containers: vec![skiff_model::ContainerTemplate::new("c", "busybox")],
            ..Default::default()
        };
        let handle = c.launch_pod("grid", &template).await.unwrap();
        assert_eq!(handle.name, "grid");
        assert_eq!(handle.uid.as_deref(), Some("uid-grid"));

        let again = c.launch_pod("grid", &template).await.unwrap_err();
        assert_eq!(again.status_code(), Some(409));
    }

    #[tokio::test]
    async fn lookup_by_session_id() {
        let fake = Arc::new(
            FakePods::default()
                .with_pod("a", &[(LABEL_SESSION_ID, "s-1")])
                .with_pod("b", &[(LABEL_SESSION_ID, "s-2")]),
        );
        let c = client(&fake);

        assert_eq!(c.get_pod_by_session_id("s-2").await.unwrap().name, "b");
        assert!(c.get_pod_by_session_id("s-3").await.unwrap_err().is_not_found());
        assert_eq!(
            c.get_pod_by_session_id(" ").await.unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let fake = Arc::new(FakePods::default().with_pod("p", &[]));
        let c = client(&fake);

        c.delete_pod_by_name("p").await.unwrap();
        assert!(c.get_pod_by_name("p").await.unwrap_err().is_not_found());
        assert!(c.delete_pod_by_name("p").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn logs_are_buffered_in_full() {
        let fake = Arc::new(FakePods::default().with_logs("p", b"line 1\nline 2\n"));
        let c = client(&fake);

        let mut body = c.logs("p", CancellationToken::new()).await.unwrap();
        let mut out = String::new();
        body.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "line 1\nline 2\n");
    }

    #[tokio::test]
    async fn non_utf8_logs_come_back_verbatim() {
        let raw = b"ok \xff\xfe done\n";
        let fake = Arc::new(FakePods::default().with_logs("p", raw));
        let c = client(&fake);

        let mut body = c.logs("p", CancellationToken::new()).await.unwrap();
        let mut out = Vec::new();
        body.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, raw);
    }

    #[tokio::test]
    async fn cancel_unblocks_a_pending_log_fetch() {
        let fake = Arc::new(FakePods::default());
        let c = Arc::new(client(&fake));
        let cancel = CancellationToken::new();

        let pending = {
            let c = Arc::clone(&c);
            let cancel = cancel.clone();
            tokio::spawn(async move { c.logs("hang-1", cancel).await.err() })
        };

        // the debug flag is not held across the pending fetch
        tokio::time::sleep(Duration::from_millis(20)).await;
        tokio::time::timeout(Duration::from_secs(1), async {
            c.set_debug(true);
            assert!(c.debug());
        })
        .await
        .unwrap();

        cancel.cancel();
        let err = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn kind_is_stable_while_debug_toggles() {
        let fake = Arc::new(FakePods::default());
        let c: Arc<dyn BackendClient> = Arc::new(client(&fake));

        let mut handles = Vec::new();
        for i in 0..16 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    c.set_debug(i % 2 == 0);
                    assert_eq!(c.kind(), BackendKind::Orchestrator);
                    tokio::task::yield_now().await;
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        c.set_debug(false);
        assert!(!c.debug());
    }

    #[tokio::test]
    async fn exposes_pod_lifecycle() {
        let fake = Arc::new(FakePods::default());
        let c: Arc<dyn BackendClient> = Arc::new(client(&fake));

        assert_eq!(c.kind(), BackendKind::Orchestrator);
        assert_eq!(c.negotiation().version(), "v1.30.2");
        assert!(c.pods().is_some());
    }
}
