use async_trait::async_trait;
use skiff_model::{ApiVersion, Negotiation};
use tracing::{debug, instrument, trace};

use crate::error::BackendError;

/// Opens connections pinned to a protocol version and asks the backend what it speaks.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Live connection handle. Dropping it releases the connection.
    type Connection: Send + Sync + 'static;

    /// Open a connection pinned to `version`, or to the SDK default for `None`.
    ///
    /// An error here means the environment is broken (bad host, bad socket path),
    /// not that the version is wrong.
    fn connect(&self, version: Option<ApiVersion>) -> Result<Self::Connection, BackendError>;

    /// Ask the backend which protocol version it answers with on `conn`.
    async fn server_version(&self, conn: &Self::Connection) -> Result<String, BackendError>;

    /// Version used when `connect(None)` is called.
    fn default_version(&self) -> ApiVersion;
}

/// Inclusive search window for [`probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBounds {
    pub ceiling: ApiVersion,
    pub floor: ApiVersion,
}

impl VersionBounds {
    pub const fn new(ceiling: ApiVersion, floor: ApiVersion) -> Self {
        Self { ceiling, floor }
    }

    /// Bounds from version strings; malformed strings count as `0.0`.
    pub fn lenient(ceiling: &str, floor: &str) -> Self {
        Self::new(
            ApiVersion::parse_lenient(ceiling),
            ApiVersion::parse_lenient(floor),
        )
    }

    /// Candidates in probe order: major descending, then minor descending.
    ///
    /// Minor runs over `ceiling.minor ..= floor.minor` for every major.
    pub fn candidates(&self) -> impl Iterator<Item = ApiVersion> + use<> {
        let (ceiling, floor) = (self.ceiling, self.floor);
        (floor.major..=ceiling.major).rev().flat_map(move |major| {
            (floor.minor..=ceiling.minor)
                .rev()
                .map(move |minor| ApiVersion::new(major, minor))
        })
    }
}

/// Downgrade search for a version the backend answers with.
///
/// Candidates are tried one at a time; a candidate matches when the backend reports
/// exactly the version the connection was pinned to. A failing version query counts
/// as a mismatch. A failing `connect` aborts the search and is returned as-is.
///
/// Returns the first match with its live connection, or `None` when the grid is exhausted.
#[instrument(level = "debug", skip(connector), fields(ceiling = %bounds.ceiling, floor = %bounds.floor))]
pub async fn probe<C: Connector>(
    connector: &C,
    bounds: VersionBounds,
) -> Result<Option<(ApiVersion, C::Connection)>, BackendError> {
    for candidate in bounds.candidates() {
        let conn = connector.connect(Some(candidate))?;
        let wanted = candidate.to_string();

        match connector.server_version(&conn).await {
            Ok(reported) if reported.trim() == wanted => {
                debug!(version = %candidate, "backend answered with pinned version");
                return Ok(Some((candidate, conn)));
            }
            Ok(reported) => {
                trace!(candidate = %candidate, reported = %reported, "version mismatch");
            }
            Err(e) => {
                trace!(candidate = %candidate, error = %e, "version query failed");
            }
        }
        drop(conn);
    }

    debug!("no candidate version matched");
    Ok(None)
}

/// Settle on a connection and report which path produced it.
///
/// `override_version` is taken verbatim when non-blank and must be `<major>.<minor>`;
/// a malformed override is [`BackendError::InvalidInput`]. The observer is not
/// called here: the caller notifies it once the client is fully built.
pub async fn negotiate<C: Connector>(
    connector: &C,
    override_version: Option<&str>,
    bounds: VersionBounds,
) -> Result<(C::Connection, Negotiation), BackendError> {
    if let Some(raw) = override_version.map(str::trim).filter(|s| !s.is_empty()) {
        let pinned: ApiVersion = raw.parse()?;
        debug!(version = %pinned, "using configured api version");
        let conn = connector.connect(Some(pinned))?;
        return Ok((conn, Negotiation::Specified(raw.to_string())));
    }

    if let Some((found, conn)) = probe(connector, bounds).await? {
        return Ok((conn, Negotiation::Determined(found.to_string())));
    }

    let fallback = connector.default_version();
    debug!(version = %fallback, "falling back to default api version");
    let conn = connector.connect(None)?;
    Ok((conn, Negotiation::UsingDefault(fallback.to_string())))
}
