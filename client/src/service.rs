//! The persistence service seam.
//!
//! Implementations own the remote side of every operation: the session
//! driver never knows whether it talks to HTTP or to memory.

use crate::error::Result;
use async_trait::async_trait;
use listsync_engine::{Outcome, Request, Task, TaskData};
use std::sync::Arc;

/// The authoritative store of a user's to-do list.
///
/// Every call is scoped to the identity the implementation was built with.
/// Mutations resolve to an [`Outcome`]: remote failures are values, not
/// errors, so the driver can roll them back.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// All todos of the current user, newest first.
    async fn list(&self) -> Result<Vec<Task>>;

    async fn create(&self, data: TaskData) -> Outcome;

    /// Replace text and completion of `id`. Not found if absent or foreign.
    async fn update(&self, id: &str, data: TaskData) -> Outcome;

    /// Remove `id`. Not found if absent or foreign.
    async fn delete(&self, id: &str) -> Outcome;

    /// Send an issued request to the matching endpoint.
    async fn dispatch(&self, request: Request) -> Outcome {
        match request {
            Request::Create(data) => self.create(data).await,
            Request::Update { id, data } => self.update(&id, data).await,
            Request::Delete { id } => self.delete(&id).await,
        }
    }
}

#[async_trait]
impl<T: PersistenceService + ?Sized> PersistenceService for Arc<T> {
    async fn list(&self) -> Result<Vec<Task>> {
        (**self).list().await
    }

    async fn create(&self, data: TaskData) -> Outcome {
        (**self).create(data).await
    }

    async fn update(&self, id: &str, data: TaskData) -> Outcome {
        (**self).update(id, data).await
    }

    async fn delete(&self, id: &str) -> Outcome {
        (**self).delete(id).await
    }
}
