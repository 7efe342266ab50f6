//! Read-only views of the synchronizer state for a presentation layer.

use crate::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// What a presentation layer renders: the visible list plus selection.
///
/// The selection is held by id and looked up on each read, never as a
/// reference into the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    /// Visible tasks, newest first
    pub todos: Vec<Task>,
    /// Number of visible tasks
    pub todos_count: usize,
    /// Currently selected task, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<TaskId>,
    /// Operations still waiting on the persistence service
    pub pending_count: usize,
}

impl ListSnapshot {
    /// Look up the selected task in this snapshot.
    pub fn selected(&self) -> Option<&Task> {
        let id = self.selected_id.as_ref()?;
        self.todos.iter().find(|t| &t.id == id)
    }

    /// True when nothing is waiting on the persistence service.
    pub fn is_settled(&self) -> bool {
        self.pending_count == 0
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
