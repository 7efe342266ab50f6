//! JSON shapes exchanged with the persistence service over HTTP.

use crate::{Task, TaskData, TaskId, Timestamp};
use serde::{Deserialize, Serialize};

/// Messages the persistence service answers with.
pub mod messages {
    pub const CREATED: &str = "Todo created successfully";
    pub const UPDATED: &str = "Todo updated successfully";
    pub const DELETED: &str = "Todo deleted successfully";
    pub const NOT_FOUND: &str = "Todo not found";
    pub const SIGN_IN: &str = "Please login to continue.";
}

/// A persisted todo as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: String,
    pub text: String,
    pub is_complete: bool,
    pub created_at: Timestamp,
}

impl TodoRecord {
    pub fn new(id: impl Into<String>, data: TaskData, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            text: data.text,
            is_complete: data.is_complete,
            created_at,
        }
    }
}

impl From<TodoRecord> for Task {
    fn from(record: TodoRecord) -> Self {
        Task {
            id: TaskId::Server(record.id),
            text: record.text,
            is_complete: record.is_complete,
            created_at: Some(record.created_at),
        }
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    pub text: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl From<TaskData> for TodoPayload {
    fn from(data: TaskData) -> Self {
        Self {
            text: data.text,
            is_complete: data.is_complete,
        }
    }
}

impl From<TodoPayload> for TaskData {
    fn from(payload: TodoPayload) -> Self {
        Self {
            text: payload.text,
            is_complete: payload.is_complete,
        }
    }
}

/// Result of a mutating call, discriminated by `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    /// Canonical record after a create or update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo: Option<TodoRecord>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            todo: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            todo: None,
        }
    }

    pub fn with_todo(mut self, todo: TodoRecord) -> Self {
        self.todo = Some(todo);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_incomplete() {
        let payload: TodoPayload = serde_json::from_str(r#"{"text":"Buy milk"}"#).unwrap();
        assert!(!payload.is_complete);
    }

    #[test]
    fn record_into_task() {
        let task: Task = TodoRecord {
            id: "abc".into(),
            text: "Buy milk".into(),
            is_complete: true,
            created_at: 42,
        }
        .into();

        assert_eq!(task.id, TaskId::server("abc"));
        assert_eq!(task.created_at, Some(42));
        assert!(task.is_complete);
    }

    #[test]
    fn response_shape() {
        let json = serde_json::to_string(&ApiResponse::failure("Todo not found")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Todo not found"}"#);

        let parsed: ApiResponse = serde_json::from_str(
            r#"{"success":true,"message":"ok","todo":{"id":"1","text":"x","isComplete":false,"createdAt":7}}"#,
        )
        .unwrap();
        assert_eq!(parsed.todo.unwrap().created_at, 7);
    }
}
