use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown backend kind: {0}")]
    UnknownBackend(String),

    #[error("invalid api version '{0}' (expected <major>.<minor>)")]
    InvalidVersion(String),

    #[error("invalid image reference '{input}': {reason}")]
    InvalidImage { input: String, reason: String },

    #[error("request id is empty")]
    EmptyRequestId,

    #[error("invalid request id '{id}': {reason}")]
    InvalidRequestId { id: String, reason: String },

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
