//! Protocol version negotiation for backends that speak several API versions.
//!
//! [`negotiate`] picks one of three paths, in order:
//! 1. an explicit override pins the connection, no probing;
//! 2. [`probe`] walks the version grid downward until the backend reports the pinned version;
//! 3. the connector's default (unpinned) version.
mod probe;
pub use probe::{Connector, VersionBounds, negotiate, probe};

mod observer;
pub use observer::TracingObserver;
