mod api;
pub use api::ApiVersion;

mod negotiation;
pub use negotiation::{Negotiation, NegotiationObserver, ObserverFn};
