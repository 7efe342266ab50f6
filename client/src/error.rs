//! Error types for the listsync client.

use listsync_engine::{Failure, FailureKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    // Transport errors
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    // Local errors
    #[error(transparent)]
    Engine(#[from] listsync_engine::Error),

    #[error("operation task aborted: {0}")]
    TaskAborted(#[from] tokio::task::JoinError),
}

impl ClientError {
    /// Status code the server answered with, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Classify a non-success status code into a remote failure.
pub fn failure_for_status(status: u16, message: impl Into<String>) -> Failure {
    let kind = match status {
        400 | 422 => FailureKind::Validation,
        401 | 403 => FailureKind::Unauthorized,
        404 => FailureKind::NotFound,
        _ => FailureKind::Transport,
    };
    Failure::new(kind, message)
}

impl From<ClientError> for Failure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => failure_for_status(status, message),
            ClientError::Engine(err) => Failure::validation(err.to_string()),
            other => Failure::transport(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
