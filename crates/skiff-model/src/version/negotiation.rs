use std::fmt;

/// How a client arrived at the protocol version it speaks.
///
/// Exactly one variant exists per constructed client, and exactly one observer
/// callback corresponds to it (see [`Negotiation::notify`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// An explicit override was configured; no probing happened.
    Specified(String),
    /// The backend was queried and this version matched.
    Determined(String),
    /// Probing found nothing; the SDK default version is in use.
    UsingDefault(String),
}

impl Negotiation {
    /// Version string carried by this outcome.
    pub fn version(&self) -> &str {
        match self {
            Negotiation::Specified(v) | Negotiation::Determined(v) | Negotiation::UsingDefault(v) => v,
        }
    }

    /// Short outcome label for logs and metrics.
    pub const fn as_label(&self) -> &'static str {
        match self {
            Negotiation::Specified(_) => "specified",
            Negotiation::Determined(_) => "determined",
            Negotiation::UsingDefault(_) => "default",
        }
    }

    /// Fire the single observer callback matching this outcome.
    pub fn notify(&self, observer: &dyn NegotiationObserver) {
        match self {
            Negotiation::Specified(v) => observer.on_version_specified(v),
            Negotiation::Determined(v) => observer.on_version_determined(v),
            Negotiation::UsingDefault(v) => observer.on_using_default_version(v),
        }
    }
}

impl fmt::Display for Negotiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_label(), self.version())
    }
}

/// Side-channel notified about which negotiation path produced a client.
///
/// Factories never call these methods directly; they go through [`Negotiation::notify`],
/// so one construction fires exactly one of them. Failed constructions fire none.
pub trait NegotiationObserver: Send + Sync {
    fn on_version_specified(&self, _version: &str) {}

    fn on_version_determined(&self, _version: &str) {}

    fn on_using_default_version(&self, _version: &str) {}
}

/// Silent observer.
impl NegotiationObserver for () {}

/// Adapts a closure over the whole [`Negotiation`] into an observer.
#[derive(Debug, Clone, Copy)]
pub struct ObserverFn<F>(pub F);

impl<F> NegotiationObserver for ObserverFn<F>
where
    F: Fn(&Negotiation) + Send + Sync,
{
    fn on_version_specified(&self, version: &str) {
        (self.0)(&Negotiation::Specified(version.to_string()));
    }

    fn on_version_determined(&self, version: &str) {
        (self.0)(&Negotiation::Determined(version.to_string()));
    }

    fn on_using_default_version(&self, version: &str) {
        (self.0)(&Negotiation::UsingDefault(version.to_string()));
    }
}
