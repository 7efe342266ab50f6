//! User-facing notices produced when an operation settles.

use crate::TaskId;
use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
}

/// Reverses a completion change: sets `id` back to `is_complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoAction {
    pub id: TaskId,
    pub is_complete: bool,
}

/// A transient, non-fatal notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: Level,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo: Option<UndoAction>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            undo: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            undo: None,
        }
    }

    pub fn with_undo(mut self, undo: UndoAction) -> Self {
        self.undo = Some(undo);
        self
    }

    /// Confirmation for a completion change.
    pub(crate) fn completion_changed(id: TaskId, is_complete: bool, previous: bool) -> Self {
        let message = if is_complete {
            "Todo marked as complete"
        } else {
            "Todo marked as incomplete"
        };
        Self::success(message).with_undo(UndoAction {
            id,
            is_complete: previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_messages() {
        let done = Notification::completion_changed(TaskId::server("1"), true, false);
        assert_eq!(done.message, "Todo marked as complete");
        assert_eq!(done.level, Level::Success);
        assert_eq!(
            done.undo,
            Some(UndoAction {
                id: TaskId::server("1"),
                is_complete: false
            })
        );

        let undone = Notification::completion_changed(TaskId::server("1"), false, true);
        assert_eq!(undone.message, "Todo marked as incomplete");
    }

    #[test]
    fn warning_has_no_undo() {
        let notice = Notification::warning("Network error");
        assert_eq!(notice.level, Level::Warning);
        assert!(notice.undo.is_none());
    }
}
