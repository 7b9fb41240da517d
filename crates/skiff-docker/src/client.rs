use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use skiff_core::{
    BackendClient, BackendError, DebugFlag, LogStream, MetricsHandle, metrics::timed,
};
use skiff_model::{BackendKind, Flag, Negotiation};
use tokio_util::{io::StreamReader, sync::CancellationToken};
use tracing::info;

use crate::stream::UntilCancelled;

/// Engine operations the client needs from a negotiated connection.
pub trait EngineConnection: Send + Sync + 'static {
    /// Combined stdout/stderr of container `id`, frame by frame.
    fn logs(&self, id: &str) -> BoxStream<'static, Result<Bytes, BackendError>>;
}

/// Client for the local container engine.
pub struct LocalEngineClient<C> {
    conn: C,
    negotiation: Negotiation,
    debug: DebugFlag,
    metrics: MetricsHandle,
}

impl<C: EngineConnection> LocalEngineClient<C> {
    pub fn new(conn: C, negotiation: Negotiation, debug: Flag, metrics: MetricsHandle) -> Self {
        Self {
            conn,
            negotiation,
            debug: DebugFlag::new(debug),
            metrics,
        }
    }

    async fn open_logs(
        &self,
        id: &str,
        cancel: CancellationToken,
    ) -> Result<LogStream, BackendError> {
        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        let mut frames = self.conn.logs(id);

        // Wait for the first frame so a missing container surfaces as an error here
        // rather than halfway through a read.
        let head = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BackendError::Cancelled),
            head = frames.next() => head,
        };
        let head = match head {
            Some(Err(e)) => return Err(e),
            other => other,
        };

        let body = futures::stream::iter(head)
            .chain(frames)
            .map_err(io::Error::other)
            .boxed();
        Ok(Box::pin(StreamReader::new(UntilCancelled::new(body, cancel))))
    }
}

#[async_trait]
impl<C: EngineConnection> BackendClient for LocalEngineClient<C> {
    fn kind(&self) -> BackendKind {
        if self.debug.get() {
            info!(target: "skiff::debug", "kind requested");
        }
        BackendKind::Local
    }

    fn negotiation(&self) -> &Negotiation {
        &self.negotiation
    }

    async fn logs(&self, id: &str, cancel: CancellationToken) -> Result<LogStream, BackendError> {
        if self.debug.get() {
            info!(target: "skiff::debug", container = id, "fetching container logs");
        }
        timed(&self.metrics, BackendKind::Local, "logs", self.open_logs(id, cancel)).await
    }

    fn set_debug(&self, enabled: bool) {
        let was = self.debug.set(enabled);
        if enabled && !was {
            info!(target: "skiff::debug", backend = %BackendKind::Local, "debug enabled");
        }
    }

    fn debug(&self) -> bool {
        self.debug.get()
    }
}
