//! Speculative mutations and the requests that make them durable.
//!
//! A user intent becomes a [`Mutation`] (the diff applied locally) and a
//! [`Request`] (the call sent to the persistence service). The diff stays in
//! the pending log until the request resolves.

use crate::{Task, TaskData, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an issued operation within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Add,
    Edit,
    /// Set the completion flag of `id`; `previous` is the value it replaced.
    #[serde(rename_all = "camelCase")]
    Toggle {
        id: TaskId,
        is_complete: bool,
        previous: bool,
    },
    Delete,
}

impl Intent {
    /// Message shown when the service fails without saying why.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Intent::Add => "Failed to add todo",
            Intent::Edit | Intent::Toggle { .. } => "Failed to edit todo",
            Intent::Delete => "Failed to delete todo",
        }
    }
}

/// A speculative diff over the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mutation {
    /// Prepend a record, or replace it in place if its id is already listed.
    Add(Task),
    /// Patch the fields of one record.
    Edit { id: TaskId, patch: TaskPatch },
    /// Remove one record.
    Delete { id: TaskId },
}

impl Mutation {
    /// The record this diff touches.
    pub fn target(&self) -> &TaskId {
        match self {
            Mutation::Add(task) => &task.id,
            Mutation::Edit { id, .. } => id,
            Mutation::Delete { id } => id,
        }
    }

    /// Apply the diff to a list in place.
    pub fn apply(&self, list: &mut Vec<Task>) {
        match self {
            Mutation::Add(task) => match list.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => *existing = task.clone(),
                None => list.insert(0, task.clone()),
            },
            Mutation::Edit { id, patch } => {
                if let Some(task) = list.iter_mut().find(|t| &t.id == id) {
                    patch.apply(task);
                }
            }
            Mutation::Delete { id } => list.retain(|t| &t.id != id),
        }
    }
}

/// A call to the persistence service. Only server ids appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    Create(TaskData),
    Update { id: String, data: TaskData },
    Delete { id: String },
}

impl Request {
    /// Server id of the targeted record; `None` for creates.
    pub fn target(&self) -> Option<&str> {
        match self {
            Request::Create(_) => None,
            Request::Update { id, .. } | Request::Delete { id } => Some(id),
        }
    }
}

/// Reconciliation status of a pending mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationStatus {
    /// The request has not resolved yet.
    InFlight,
    /// The service accepted it as the `seq`-th confirmation of the session;
    /// waiting for earlier entries to settle.
    #[serde(rename_all = "camelCase")]
    Confirmed { seq: u64 },
}

/// An entry in the pending log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    pub op_id: OperationId,
    pub intent: Intent,
    /// The call sent for this entry
    pub request: Request,
    /// `None` when the target was not visible: the request still goes out
    /// but nothing changes locally.
    pub mutation: Option<Mutation>,
    pub status: MutationStatus,
}

impl PendingMutation {
    pub fn new(
        op_id: OperationId,
        intent: Intent,
        request: Request,
        mutation: Option<Mutation>,
    ) -> Self {
        Self {
            op_id,
            intent,
            request,
            mutation,
            status: MutationStatus::InFlight,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == MutationStatus::InFlight
    }

    /// Confirmation sequence number, once the service accepted the entry.
    pub fn confirmed_seq(&self) -> Option<u64> {
        match self.status {
            MutationStatus::InFlight => None,
            MutationStatus::Confirmed { seq } => Some(seq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskData;

    fn list() -> Vec<Task> {
        vec![
            Task::new("2", "Walk dog", false, 2000),
            Task::new("1", "Buy milk", false, 1000),
        ]
    }

    #[test]
    fn add_prepends() {
        let mut tasks = list();
        let task = Task::speculative(TaskId::Temp(1), TaskData::new("Call mom"));
        Mutation::Add(task.clone()).apply(&mut tasks);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0], task);
    }

    #[test]
    fn add_with_listed_id_replaces_in_place() {
        let mut tasks = list();
        let canonical = Task::new("1", "Buy milk", true, 1000);
        Mutation::Add(canonical.clone()).apply(&mut tasks);

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1], canonical);
    }

    #[test]
    fn edit_patches_target_only() {
        let mut tasks = list();
        Mutation::Edit {
            id: TaskId::server("1"),
            patch: TaskPatch::completion(true),
        }
        .apply(&mut tasks);

        assert!(tasks[1].is_complete);
        assert!(!tasks[0].is_complete);
    }

    #[test]
    fn edit_missing_target_is_noop() {
        let mut tasks = list();
        Mutation::Edit {
            id: TaskId::server("9"),
            patch: TaskPatch::completion(true),
        }
        .apply(&mut tasks);

        assert_eq!(tasks, list());
    }

    #[test]
    fn delete_removes_target() {
        let mut tasks = list();
        Mutation::Delete {
            id: TaskId::server("2"),
        }
        .apply(&mut tasks);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId::server("1"));
    }

    #[test]
    fn mutation_target() {
        let delete = Mutation::Delete {
            id: TaskId::server("7"),
        };
        assert_eq!(delete.target(), &TaskId::server("7"));
    }

    #[test]
    fn request_target() {
        assert_eq!(Request::Create(TaskData::new("x")).target(), None);
        assert_eq!(
            Request::Delete { id: "3".into() }.target(),
            Some("3")
        );
    }

    #[test]
    fn fallback_messages() {
        assert_eq!(Intent::Add.fallback_message(), "Failed to add todo");
        assert_eq!(Intent::Edit.fallback_message(), "Failed to edit todo");
        assert_eq!(Intent::Delete.fallback_message(), "Failed to delete todo");
    }

    #[test]
    fn confirmed_seq_follows_status() {
        let mut entry = PendingMutation::new(
            OperationId(1),
            Intent::Delete,
            Request::Delete { id: "1".into() },
            None,
        );
        assert!(entry.is_in_flight());
        assert_eq!(entry.confirmed_seq(), None);

        entry.status = MutationStatus::Confirmed { seq: 4 };
        assert!(!entry.is_in_flight());
        assert_eq!(entry.confirmed_seq(), Some(4));
    }

    #[test]
    fn request_serialization() {
        let request = Request::Update {
            id: "1".into(),
            data: TaskData::new("Buy oat milk"),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"update\""));

        let parsed: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}
