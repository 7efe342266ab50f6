//! Task records and the field-level changes applied to them.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task within one user's list.
///
/// Server ids come from the persistence service. Temp ids are placeholders
/// for speculative records and never leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskId {
    Server(String),
    Temp(u64),
}

impl TaskId {
    /// Wrap a server-assigned id.
    pub fn server(id: impl Into<String>) -> Self {
        TaskId::Server(id.into())
    }

    /// True for speculative placeholders.
    pub fn is_temp(&self) -> bool {
        matches!(self, TaskId::Temp(_))
    }

    /// The server id, if this is one.
    pub fn as_server(&self) -> Option<&str> {
        match self {
            TaskId::Server(id) => Some(id),
            TaskId::Temp(_) => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Server(id) => f.write_str(id),
            TaskId::Temp(n) => write!(f, "tmp-{n}"),
        }
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId::server(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        TaskId::Server(id)
    }
}

/// The user-editable fields of a task.
///
/// Used as the draft for an add and as the full replacement for an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    pub text: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl TaskData {
    /// A draft with `is_complete` defaulted to `false`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_complete: false,
        }
    }

    pub fn with_complete(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }
}

/// A task as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub is_complete: bool,
    /// Assigned by the persistence service; absent while speculative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Task {
    /// A confirmed task with a server id.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        is_complete: bool,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: TaskId::server(id),
            text: text.into(),
            is_complete,
            created_at: Some(created_at),
        }
    }

    /// A speculative task that has not been confirmed yet.
    pub fn speculative(id: TaskId, data: TaskData) -> Self {
        Self {
            id,
            text: data.text,
            is_complete: data.is_complete,
            created_at: None,
        }
    }

    pub fn is_speculative(&self) -> bool {
        self.id.is_temp()
    }

    /// Copy out the editable fields.
    pub fn data(&self) -> TaskData {
        TaskData {
            text: self.text.clone(),
            is_complete: self.is_complete,
        }
    }
}

/// A partial change to a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl TaskPatch {
    /// Patch every editable field.
    pub fn replace(data: TaskData) -> Self {
        Self {
            text: Some(data.text),
            is_complete: Some(data.is_complete),
        }
    }

    /// Patch only the completion flag.
    pub fn completion(is_complete: bool) -> Self {
        Self {
            text: None,
            is_complete: Some(is_complete),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_complete.is_none()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text.clone_from(text);
        }
        if let Some(is_complete) = self.is_complete {
            task.is_complete = is_complete;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_task() {
        let task = Task::new("1", "Buy milk", false, 1000);

        assert_eq!(task.id, TaskId::server("1"));
        assert_eq!(task.created_at, Some(1000));
        assert!(!task.is_speculative());
    }

    #[test]
    fn speculative_task() {
        let task = Task::speculative(TaskId::Temp(3), TaskData::new("Call mom"));

        assert!(task.is_speculative());
        assert!(!task.is_complete);
        assert_eq!(task.created_at, None);
        assert_eq!(task.id.to_string(), "tmp-3");
    }

    #[test]
    fn completion_patch_keeps_text() {
        let mut task = Task::new("1", "Buy milk", false, 1000);
        TaskPatch::completion(true).apply(&mut task);

        assert!(task.is_complete);
        assert_eq!(task.text, "Buy milk");
    }

    #[test]
    fn replace_patch_sets_both_fields() {
        let mut task = Task::new("1", "Buy milk", true, 1000);
        TaskPatch::replace(TaskData::new("Buy oat milk")).apply(&mut task);

        assert_eq!(task.text, "Buy oat milk");
        assert!(!task.is_complete);
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut task = Task::new("1", "Buy milk", false, 1000);
        let before = task.clone();
        let patch = TaskPatch::default();

        assert!(patch.is_empty());
        patch.apply(&mut task);
        assert_eq!(task, before);
    }

    #[test]
    fn task_data_defaults_incomplete() {
        let data: TaskData = serde_json::from_str(r#"{"text":"Walk dog"}"#).unwrap();
        assert!(!data.is_complete);
    }

    #[test]
    fn serialization_format() {
        let task = Task::new("1", "Buy milk", false, 1000);
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"isComplete\":false"));
        assert!(json.contains("\"createdAt\":1000"));
        assert!(json.contains("\"server\":\"1\""));
    }
}
