use async_trait::async_trait;
use bollard::{
    API_DEFAULT_VERSION, ClientVersion, Docker, container::LogsOptions, errors::Error as SdkError,
};
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use skiff_core::{BackendError, Connector};
use skiff_model::ApiVersion;
use tracing::trace;

use crate::client::EngineConnection;

const DEFAULT_SOCKET: &str = "/var/run/docker.sock";
const CONNECT_TIMEOUT_SECS: u64 = 120;

/// Version the SDK speaks when no version is pinned.
pub fn sdk_default_version() -> ApiVersion {
    ApiVersion::new(
        API_DEFAULT_VERSION.major_version as u32,
        API_DEFAULT_VERSION.minor_version as u32,
    )
}

/// [`Connector`] backed by the `bollard` Engine SDK.
#[derive(Debug, Clone, Default)]
pub struct BollardConnector {
    host: Option<String>,
}

impl BollardConnector {
    /// `host` accepts `unix://`, `tcp://`, `http://` or a bare socket path.
    pub fn new(host: Option<String>) -> Self {
        Self { host }
    }

    fn open(&self, version: &ClientVersion) -> Result<Docker, SdkError> {
        match self.host.as_deref() {
            None => Docker::connect_with_unix(DEFAULT_SOCKET, CONNECT_TIMEOUT_SECS, version),
            Some(host) if host.starts_with("tcp://") || host.starts_with("http://") => {
                Docker::connect_with_http(host, CONNECT_TIMEOUT_SECS, version)
            }
            Some(host) => Docker::connect_with_unix(host, CONNECT_TIMEOUT_SECS, version),
        }
    }
}

#[async_trait]
impl Connector for BollardConnector {
    type Connection = Docker;

    fn connect(&self, version: Option<ApiVersion>) -> Result<Docker, BackendError> {
        if let Some(host) = self.host.as_deref() {
            let scheme = host.split_once("://").map(|(scheme, _)| scheme);
            if !matches!(scheme, None | Some("unix" | "tcp" | "http")) {
                return Err(BackendError::Connection(format!(
                    "unsupported engine host scheme: {host}"
                )));
            }
        }

        let v = version.unwrap_or_else(sdk_default_version);
        let pinned = ClientVersion {
            major_version: v.major as usize,
            minor_version: v.minor as usize,
        };
        trace!(host = ?self.host, version = ?version, "opening engine connection");
        self.open(&pinned).map_err(map_sdk_error)
    }

    async fn server_version(&self, conn: &Docker) -> Result<String, BackendError> {
        let info = conn.version().await.map_err(map_sdk_error)?;
        info.api_version
            .ok_or_else(|| BackendError::rejected(None, "engine did not report an api version"))
    }

    fn default_version(&self) -> ApiVersion {
        sdk_default_version()
    }
}

impl EngineConnection for Docker {
    fn logs(&self, id: &str) -> BoxStream<'static, Result<Bytes, BackendError>> {
        let opts = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            ..Default::default()
        };
        Docker::logs(self, id, Some(opts))
            .map(|frame| frame.map(|out| out.into_bytes()).map_err(map_sdk_error))
            .boxed()
    }
}

/// Server answers keep their status code; everything else is a transport problem.
pub(crate) fn map_sdk_error(err: SdkError) -> BackendError {
    match err {
        SdkError::DockerResponseServerError {
            status_code,
            message,
        } => BackendError::rejected(Some(status_code), message),
        other => BackendError::Connection(other.to_string()),
    }
}
