//! Error types for the listsync engine.

use crate::{OperationId, TaskId};
use thiserror::Error;

/// Errors raised locally, before or instead of a remote call.
///
/// Remote failures are not errors at this level: they arrive as a
/// [`Failure`](crate::Failure) outcome and are rolled back by the
/// synchronizer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("{message}")]
    Validation { field: String, message: String },

    // Target errors
    #[error("todo not found: {0}")]
    TaskNotFound(TaskId),

    #[error("todo is still being saved: {0}")]
    Unconfirmed(TaskId),

    // Reconciliation errors
    #[error("unknown operation: {0}")]
    UnknownOperation(OperationId),
}

impl Error {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
