//! Synchronizer - the optimistic list state container.
//!
//! Holds the confirmed baseline, the log of pending mutations and the
//! visible list derived from both. Every user intent is split in two:
//!
//! - an issue step (`add`, `edit`, `toggle_complete`, `delete`, ...) that
//!   validates, applies the speculative diff and returns the [`Request`] to
//!   send;
//! - [`Synchronizer::complete`], called with the service outcome, which
//!   confirms the diff or removes it.
//!
//! The synchronizer does no IO. A driver owns the network calls.

use crate::{
    error::Result, reconcile, validation, Error, Intent, ListSnapshot, Mutation, MutationStatus,
    Notification, OperationId, Outcome, PendingMutation, Request, SessionClock, Task, TaskData,
    TaskId, TaskPatch, UndoAction,
};
use crate::{Ack, Failure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Taken with [`Synchronizer::begin_rebase`] before a list is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebaseMark(u64);

/// An operation that has been applied speculatively and must be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issued {
    pub op_id: OperationId,
    pub request: Request,
}

/// What happened when an operation settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub op_id: OperationId,
    pub intent: Intent,
    pub succeeded: bool,
    /// Notice for the user, if this outcome warrants one
    pub notification: Option<Notification>,
    /// Draft text of a failed add, handed back so input is not lost
    pub restored_text: Option<String>,
    /// Cached views of the list should be refreshed
    pub refresh: bool,
}

/// The optimistic list synchronizer for one user session.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    clock: SessionClock,
    /// Last confirmed list
    baseline: Vec<Task>,
    /// Speculative diffs in issue order
    pending: Vec<PendingMutation>,
    /// `baseline` with `pending` folded over it
    visible: Vec<Task>,
    selected: Option<TaskId>,
    /// Temp ids of confirmed adds, mapped to their server ids
    aliases: HashMap<u64, String>,
    /// Confirmations so far
    confirmations: u64,
    /// Entries compacted since a rebase mark was taken
    journal: Option<Vec<PendingMutation>>,
}

impl Synchronizer {
    /// Seed a synchronizer with the list fetched at session start.
    pub fn new(baseline: Vec<Task>) -> Self {
        Self {
            visible: baseline.clone(),
            baseline,
            ..Self::default()
        }
    }

    /// Tasks as the user should see them, newest first.
    pub fn visible(&self) -> &[Task] {
        &self.visible
    }

    /// Last confirmed list.
    pub fn baseline(&self) -> &[Task] {
        &self.baseline
    }

    pub fn todos_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of operations not yet folded into the baseline.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The pending log.
    pub fn pending(&self) -> &[PendingMutation] {
        &self.pending
    }

    /// Look up a visible task. Temp ids of confirmed adds still resolve.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        let id = self.resolve(id);
        self.visible.iter().find(|t| t.id == id)
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// The selected task, looked up by id in the current visible list.
    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<TaskId>) {
        self.selected = id.map(|id| self.resolve(&id));
    }

    /// Copy of the state a presentation layer renders.
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            todos: self.visible.clone(),
            todos_count: self.todos_count(),
            selected_id: self.selected.clone(),
            pending_count: self.pending.len(),
        }
    }

    /// Speculatively prepend a new task.
    pub fn add(&mut self, draft: TaskData) -> Result<Issued> {
        validation::validate(&draft)?;

        let op_id = self.clock.next_operation();
        let task = Task::speculative(self.clock.next_temp_id(), draft.clone());
        Ok(self.push(
            op_id,
            Intent::Add,
            Request::Create(draft),
            Some(Mutation::Add(task)),
        ))
    }

    /// Speculatively replace the fields of a task.
    ///
    /// If the task is not visible, nothing changes locally but the update is
    /// still issued and the service decides.
    pub fn edit(&mut self, id: &TaskId, data: TaskData) -> Result<Issued> {
        validation::validate(&data)?;

        let id = self.resolve(id);
        let server_id = self.server_id(&id)?;
        let mutation = self.visible.iter().any(|t| t.id == id).then(|| Mutation::Edit {
            id: id.clone(),
            patch: TaskPatch::replace(data.clone()),
        });

        let op_id = self.clock.next_operation();
        let request = Request::Update {
            id: server_id,
            data,
        };
        Ok(self.push(op_id, Intent::Edit, request, mutation))
    }

    /// Flip the completion flag of a visible task.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<Issued> {
        let current = self
            .get(id)
            .map(|t| t.is_complete)
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
        self.set_complete(id, !current)
    }

    /// Set the completion flag of a visible task, leaving its text alone.
    ///
    /// The update carries the text as currently shown, including a pending
    /// edit. Whatever the service stores is written back on success.
    pub fn set_complete(&mut self, id: &TaskId, is_complete: bool) -> Result<Issued> {
        let id = self.resolve(id);
        let server_id = self.server_id(&id)?;
        let current = self
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        let op_id = self.clock.next_operation();
        let intent = Intent::Toggle {
            id: id.clone(),
            is_complete,
            previous: current.is_complete,
        };
        let request = Request::Update {
            id: server_id,
            data: TaskData {
                text: current.text,
                is_complete,
            },
        };
        let mutation = Mutation::Edit {
            id,
            patch: TaskPatch::completion(is_complete),
        };
        Ok(self.push(op_id, intent, request, Some(mutation)))
    }

    /// Reverse a completion change as a fresh operation.
    pub fn undo(&mut self, action: &UndoAction) -> Result<Issued> {
        self.set_complete(&action.id, action.is_complete)
    }

    /// Speculatively remove a task.
    ///
    /// Clears the selection if it points at `id`, whatever happens next.
    pub fn delete(&mut self, id: &TaskId) -> Result<Issued> {
        let id = self.resolve(id);
        if self.selected.as_ref().is_some_and(|s| self.resolve(s) == id) {
            self.selected = None;
        }

        let server_id = self.server_id(&id)?;
        let mutation = self
            .visible
            .iter()
            .any(|t| t.id == id)
            .then(|| Mutation::Delete { id });

        let op_id = self.clock.next_operation();
        let request = Request::Delete { id: server_id };
        Ok(self.push(op_id, Intent::Delete, request, mutation))
    }

    /// Settle an issued operation with the service outcome.
    ///
    /// Success confirms the diff; failure removes exactly that diff from the
    /// log, whatever else is in flight.
    pub fn complete(&mut self, op_id: OperationId, outcome: Outcome) -> Result<Completion> {
        let index = self
            .pending
            .iter()
            .position(|p| p.op_id == op_id && p.is_in_flight())
            .ok_or(Error::UnknownOperation(op_id))?;

        let completion = match outcome {
            Ok(ack) => self.confirm(index, ack),
            Err(failure) => self.roll_back(index, failure),
        };

        let compacted = reconcile::compact(&mut self.baseline, &mut self.pending);
        if let Some(journal) = &mut self.journal {
            journal.extend(compacted);
        }
        self.recompute();

        Ok(completion)
    }

    /// Mark the point a list fetch starts from. Pass the mark to
    /// [`rebase`](Self::rebase) together with the fetched list.
    ///
    /// Only one fetch should be outstanding at a time; a rebase ends every
    /// open mark.
    pub fn begin_rebase(&mut self) -> RebaseMark {
        self.journal.get_or_insert_with(Vec::new);
        RebaseMark(self.confirmations)
    }

    /// Replace the baseline with a list fetched after `mark` was taken.
    ///
    /// Diffs confirmed before the mark are part of the fetched list and are
    /// dropped. Diffs confirmed since, compacted or not, are re-applied to
    /// the new baseline, and in-flight diffs stay on top.
    pub fn rebase(&mut self, mark: RebaseMark, list: Vec<Task>) {
        let since_mark = |entry: &PendingMutation| {
            entry.confirmed_seq().map_or(true, |seq| seq > mark.0)
        };

        self.baseline = list;
        let replay = self.journal.take().unwrap_or_default();
        for mutation in replay
            .into_iter()
            .filter(since_mark)
            .filter_map(|entry| entry.mutation)
        {
            mutation.apply(&mut self.baseline);
        }
        self.pending.retain(since_mark);
        self.recompute();
    }

    fn confirm(&mut self, index: usize, ack: Ack) -> Completion {
        self.confirmations += 1;
        let entry = &mut self.pending[index];
        entry.status = MutationStatus::Confirmed {
            seq: self.confirmations,
        };

        match (&mut entry.mutation, ack.record) {
            (Some(Mutation::Add(task)), Some(record)) => {
                if let (TaskId::Temp(temp), TaskId::Server(server)) = (&task.id, &record.id) {
                    self.aliases.insert(*temp, server.clone());
                    if self.selected.as_ref() == Some(&task.id) {
                        self.selected = Some(record.id.clone());
                    }
                }
                *task = record;
            }
            // The service stored every editable field
            (Some(Mutation::Edit { patch, .. }), record) => {
                if let Request::Update { data, .. } = &entry.request {
                    let stored = record.map_or_else(|| data.clone(), |r| r.data());
                    *patch = TaskPatch::replace(stored);
                }
            }
            _ => {}
        }

        let notification = match &entry.intent {
            Intent::Toggle {
                id,
                is_complete,
                previous,
            } => Some(Notification::completion_changed(
                id.clone(),
                *is_complete,
                *previous,
            )),
            Intent::Delete => Some(Notification::success("Task deleted")),
            _ => None,
        };

        Completion {
            op_id: entry.op_id,
            intent: entry.intent.clone(),
            succeeded: true,
            notification,
            restored_text: None,
            refresh: true,
        }
    }

    fn roll_back(&mut self, index: usize, failure: Failure) -> Completion {
        let entry = self.pending.remove(index);
        let message = failure.message_or(entry.intent.fallback_message());

        let restored_text = match entry.mutation {
            Some(Mutation::Add(task)) => {
                if self.selected.as_ref() == Some(&task.id) {
                    self.selected = None;
                }
                Some(task.text)
            }
            _ => None,
        };

        Completion {
            op_id: entry.op_id,
            intent: entry.intent,
            succeeded: false,
            notification: Some(Notification::warning(message)),
            restored_text,
            refresh: false,
        }
    }

    fn push(
        &mut self,
        op_id: OperationId,
        intent: Intent,
        request: Request,
        mutation: Option<Mutation>,
    ) -> Issued {
        if let Some(mutation) = &mutation {
            mutation.apply(&mut self.visible);
        }
        self.pending.push(PendingMutation::new(
            op_id,
            intent,
            request.clone(),
            mutation,
        ));
        Issued { op_id, request }
    }

    fn recompute(&mut self) {
        self.visible = reconcile::fold(&self.baseline, &self.pending);
    }

    fn resolve(&self, id: &TaskId) -> TaskId {
        match id {
            TaskId::Temp(temp) => match self.aliases.get(temp) {
                Some(server) => TaskId::Server(server.clone()),
                None => id.clone(),
            },
            TaskId::Server(_) => id.clone(),
        }
    }

    fn server_id(&self, id: &TaskId) -> Result<String> {
        match id {
            TaskId::Server(server) => Ok(server.clone()),
            TaskId::Temp(_) => Err(Error::Unconfirmed(id.clone())),
        }
    }
}
