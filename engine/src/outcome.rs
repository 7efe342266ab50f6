//! Results reported by the persistence service.

use crate::Task;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// The payload was rejected (e.g. text too long).
    Validation,
    /// The record does not exist or belongs to someone else.
    NotFound,
    /// There is no signed-in identity.
    Unauthorized,
    /// Network trouble or anything else.
    Transport,
}

/// A failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    /// The service message, or `fallback` when it is blank.
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

/// A successful remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub message: String,
    /// The canonical record, when the service returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Task>,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            record: None,
        }
    }

    pub fn with_record(mut self, record: Task) -> Self {
        self.record = Some(record);
        self
    }
}

/// How a remote call resolved.
pub type Outcome = std::result::Result<Ack, Failure>;
