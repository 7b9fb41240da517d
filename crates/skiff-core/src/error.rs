use std::{fmt, io};

use skiff_model::{BackendKind, ModelError};
use thiserror::Error;

/// Failure of a backend operation or of client construction.
///
/// Every variant maps to one [`ErrorKind`]; callers branch on the kind, not the message.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached at all.
    #[error("connection error: {0}")]
    Connection(String),

    /// The engine or control plane answered with an application-level error.
    #[error("backend rejected request{}: {message}", fmt_code(.code))]
    Rejected { code: Option<u16>, message: String },

    /// The session-id label on a pod is already set.
    #[error("{label} is already set on pod {pod}")]
    SessionConflict { pod: String, label: String },

    /// Malformed caller input; nothing was sent to the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller cancelled the operation while it was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl BackendError {
    pub fn rejected(code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Connection(_) => ErrorKind::Connection,
            BackendError::Rejected { .. } | BackendError::SessionConflict { .. } => {
                ErrorKind::Rejected
            }
            BackendError::InvalidInput(_) => ErrorKind::InvalidInput,
            BackendError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Only connection failures and cancellations are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Connection | ErrorKind::Cancelled)
    }

    /// HTTP-style status carried by a rejection, `409` for a session conflict.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Rejected { code, .. } => *code,
            BackendError::SessionConflict { .. } => Some(409),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Backend error carried inside an I/O error raised by a [`LogStream`](crate::LogStream) read.
    pub fn from_io(err: &io::Error) -> Option<&BackendError> {
        err.get_ref()?.downcast_ref::<BackendError>()
    }
}

impl From<ModelError> for BackendError {
    fn from(e: ModelError) -> Self {
        BackendError::InvalidInput(e.to_string())
    }
}

fn fmt_code(code: &Option<u16>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Rejected,
    InvalidInput,
    Cancelled,
}

impl ErrorKind {
    pub const fn as_label(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Rejected => "rejected",
            ErrorKind::InvalidInput => "invalid",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Errors raised by the factory registry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no client factory registered for backend: {0}")]
    NoFactory(BackendKind),

    #[error("client factory for backend {0} is already registered")]
    DuplicateFactory(BackendKind),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
