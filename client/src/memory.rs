//! In-process persistence service.
//!
//! Keeps every user's list in memory. Useful for tests and demos: failures
//! can be injected per target and responses can be held back until
//! released, which makes out-of-order completions reproducible.

use crate::error::Result;
use crate::service::PersistenceService;
use async_trait::async_trait;
use listsync_engine::validation::validate;
use listsync_engine::wire::messages;
use listsync_engine::{Ack, Failure, Outcome, Task, TaskData, TodoRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

#[derive(Debug, Default)]
struct Store {
    /// Records by user id, newest first
    todos: HashMap<String, Vec<TodoRecord>>,
    /// Injected failures by text (creates) or id (updates, deletes)
    failures: HashMap<String, Failure>,
    /// Gates by text or id; a held call waits for a permit
    holds: HashMap<String, Arc<Semaphore>>,
    next_id: u64,
    now: u64,
}

impl Store {
    fn next_record(&mut self, user: &str, data: TaskData) -> TodoRecord {
        self.next_id += 1;
        self.now += 1;
        let record = TodoRecord::new(format!("mem-{}", self.next_id), data, self.now);
        self.todos
            .entry(user.to_string())
            .or_default()
            .insert(0, record.clone());
        record
    }

    fn find_mut(&mut self, user: &str, id: &str) -> Option<&mut TodoRecord> {
        self.todos
            .get_mut(user)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
    }
}

/// A [`PersistenceService`] backed by a shared in-memory map.
///
/// Clones share storage; [`for_user`](Self::for_user) gives a view scoped
/// to another identity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    store: Arc<Mutex<Store>>,
    user: Option<String>,
}

impl InMemoryPersistence {
    /// A service with no signed-in identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// A view of the same storage as `user`.
    pub fn for_user(&self, user: impl Into<String>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            user: Some(user.into()),
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Store a record for the current user, as if created earlier.
    pub async fn seed(&self, data: TaskData) -> Option<Task> {
        let user = self.user.as_deref()?;
        let mut store = self.store.lock().await;
        Some(store.next_record(user, data).into())
    }

    /// Make the next call targeting `key` (a create's text, or an id) fail.
    pub async fn fail_on(&self, key: impl Into<String>, failure: Failure) {
        self.store.lock().await.failures.insert(key.into(), failure);
    }

    /// Hold every call targeting `key` until [`release`](Self::release).
    pub async fn hold(&self, key: impl Into<String>) {
        self.store
            .lock()
            .await
            .holds
            .insert(key.into(), Arc::new(Semaphore::new(0)));
    }

    /// Let one held call targeting `key` through.
    pub async fn release(&self, key: &str) {
        if let Some(gate) = self.store.lock().await.holds.get(key) {
            gate.add_permits(1);
        }
    }

    /// Records the service holds for the current user.
    pub async fn records(&self) -> Vec<TodoRecord> {
        let store = self.store.lock().await;
        self.user
            .as_deref()
            .and_then(|user| store.todos.get(user).cloned())
            .unwrap_or_default()
    }

    /// Wait at the gate for `key`, then take any injected failure.
    async fn enter(&self, key: &str) -> std::result::Result<(), Failure> {
        let gate = self.store.lock().await.holds.get(key).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match self.store.lock().await.failures.remove(key) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn validate(data: &TaskData) -> std::result::Result<(), Failure> {
        validate(data).map_err(|err| Failure::validation(err.to_string()))
    }
}

#[async_trait]
impl PersistenceService for InMemoryPersistence {
    async fn list(&self) -> Result<Vec<Task>> {
        Ok(self.records().await.into_iter().map(Task::from).collect())
    }

    async fn create(&self, data: TaskData) -> Outcome {
        self.enter(&data.text).await?;
        Self::validate(&data)?;

        let user = self
            .user
            .as_deref()
            .ok_or_else(|| Failure::unauthorized(messages::SIGN_IN))?;

        let record = self.store.lock().await.next_record(user, data);
        Ok(Ack::new(messages::CREATED).with_record(record.into()))
    }

    async fn update(&self, id: &str, data: TaskData) -> Outcome {
        self.enter(id).await?;
        Self::validate(&data)?;

        let user = self.user.as_deref().unwrap_or_default();
        let mut store = self.store.lock().await;
        let record = store
            .find_mut(user, id)
            .ok_or_else(|| Failure::not_found(messages::NOT_FOUND))?;

        record.text = data.text;
        record.is_complete = data.is_complete;
        Ok(Ack::new(messages::UPDATED).with_record(record.clone().into()))
    }

    async fn delete(&self, id: &str) -> Outcome {
        self.enter(id).await?;

        let user = self.user.as_deref().unwrap_or_default();
        let mut store = self.store.lock().await;
        let not_found = || Failure::not_found(messages::NOT_FOUND);
        let list = store.todos.get_mut(user).ok_or_else(not_found)?;
        let index = list.iter().position(|r| r.id == id).ok_or_else(not_found)?;

        list.remove(index);
        Ok(Ack::new(messages::DELETED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listsync_engine::FailureKind;

    #[tokio::test]
    async fn lists_are_scoped_by_user() {
        let service = InMemoryPersistence::new();
        let alice = service.for_user("alice");
        let bob = service.for_user("bob");

        alice.seed(TaskData::new("Buy milk")).await.unwrap();
        let created = alice.create(TaskData::new("Call mom")).await.unwrap();
        let id = created.record.unwrap().id.to_string();

        let texts: Vec<_> = alice.list().await.unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Call mom", "Buy milk"]);
        assert!(bob.list().await.unwrap().is_empty());

        let failure = bob.delete(&id).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.message, "Todo not found");
    }

    #[tokio::test]
    async fn anonymous_create_is_unauthorized() {
        let service = InMemoryPersistence::new();

        let failure = service.create(TaskData::new("Call mom")).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Unauthorized);
        assert!(service.list().await.unwrap().is_empty());
        assert!(service.seed(TaskData::new("x")).await.is_none());
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let service = InMemoryPersistence::new().for_user("alice");
        service
            .fail_on("Call mom", Failure::transport("Network error"))
            .await;

        let first = service.create(TaskData::new("Call mom")).await;
        assert_eq!(first.unwrap_err().message, "Network error");

        assert!(service.create(TaskData::new("Call mom")).await.is_ok());
    }

    #[tokio::test]
    async fn service_validates_text() {
        let service = InMemoryPersistence::new().for_user("alice");

        let failure = service.create(TaskData::new("x".repeat(251))).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.message, "Todo must be at most 250 characters long");
    }

    #[tokio::test]
    async fn held_call_waits_for_release() {
        let service = InMemoryPersistence::new().for_user("alice");
        service.hold("Call mom").await;

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.create(TaskData::new("Call mom")).await }
        });

        tokio::task::yield_now().await;
        assert!(service.records().await.is_empty());

        service.release("Call mom").await;
        assert!(pending.await.unwrap().is_ok());
        assert_eq!(service.records().await.len(), 1);
    }
}
