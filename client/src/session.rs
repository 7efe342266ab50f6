//! Session driver.
//!
//! A [`Session`] owns one [`Synchronizer`] and one persistence service.
//! Each intent is applied under a short lock, then its request runs in its
//! own spawned task; the completion is fed back under the lock again. The
//! lock is never held across a network call.
//!
//! Presentation layers read state through a `watch` channel of
//! [`ListSnapshot`]s and get notices through a `broadcast` channel.

use crate::error::Result;
use crate::service::PersistenceService;
use listsync_engine::{
    Completion, Issued, ListSnapshot, Notification, OperationId, Outcome, Synchronizer, Task,
    TaskData, TaskId, UndoAction,
};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Notices buffered per subscriber before the oldest are dropped.
const NOTIFICATION_CAPACITY: usize = 64;

struct Shared<S> {
    service: S,
    sync: Mutex<Synchronizer>,
    view: watch::Sender<ListSnapshot>,
    notifications: broadcast::Sender<Notification>,
    /// Bumped after every confirmed mutation
    revision: watch::Sender<u64>,
    /// Held across a reload's fetch; one reload at a time
    reloading: Mutex<()>,
}

impl<S: PersistenceService> Shared<S> {
    fn publish(&self, sync: &Synchronizer) {
        self.view.send_replace(sync.snapshot());
    }

    async fn settle(&self, op_id: OperationId, outcome: Outcome) -> Result<Completion> {
        let completion = {
            let mut sync = self.sync.lock().await;
            let completion = sync.complete(op_id, outcome)?;
            self.publish(&sync);
            completion
        };

        debug!(op = %op_id, succeeded = completion.succeeded, "operation settled");

        if let Some(notification) = &completion.notification {
            // No subscribers is fine
            let _ = self.notifications.send(notification.clone());
        }
        if completion.refresh {
            self.revision.send_modify(|rev| *rev += 1);
        }

        Ok(completion)
    }
}

/// Handle to an operation whose request is in flight.
///
/// Dropping it does not cancel the operation.
#[derive(Debug)]
pub struct PendingOp {
    op_id: OperationId,
    handle: JoinHandle<Result<Completion>>,
}

impl PendingOp {
    pub fn op_id(&self) -> OperationId {
        self.op_id
    }

    /// Wait until the service answered and the list was reconciled.
    pub async fn settled(self) -> Result<Completion> {
        self.handle.await?
    }
}

/// One user's optimistic to-do list bound to a persistence service.
pub struct Session<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: PersistenceService + 'static> Session<S> {
    /// Fetch the user's list and start a session on it.
    pub async fn start(service: S) -> Result<Self> {
        let list = service.list().await?;
        debug!(todos = list.len(), "session started");
        Ok(Self::with_list(service, list))
    }

    /// Start a session on an already fetched list.
    pub fn with_list(service: S, list: Vec<Task>) -> Self {
        let sync = Synchronizer::new(list);
        let (view, _) = watch::channel(sync.snapshot());
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let (revision, _) = watch::channel(0);

        Self {
            shared: Arc::new(Shared {
                service,
                sync: Mutex::new(sync),
                view,
                notifications,
                revision,
                reloading: Mutex::new(()),
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.shared.service
    }

    /// Current state of the list.
    pub fn view(&self) -> ListSnapshot {
        self.shared.view.borrow().clone()
    }

    /// Follow the list as it changes.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.shared.view.subscribe()
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifications.subscribe()
    }

    /// Revision counter bumped after each confirmed mutation, for caches
    /// that should be refreshed.
    pub fn refreshes(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub async fn add(&self, draft: TaskData) -> Result<PendingOp> {
        self.issue(|sync| sync.add(draft)).await
    }

    pub async fn edit(&self, id: &TaskId, data: TaskData) -> Result<PendingOp> {
        self.issue(|sync| sync.edit(id, data)).await
    }

    pub async fn toggle_complete(&self, id: &TaskId) -> Result<PendingOp> {
        self.issue(|sync| sync.toggle_complete(id)).await
    }

    /// Apply the undo offered by a completion notice.
    pub async fn undo(&self, action: &UndoAction) -> Result<PendingOp> {
        self.issue(|sync| sync.undo(action)).await
    }

    pub async fn delete(&self, id: &TaskId) -> Result<PendingOp> {
        self.issue(|sync| sync.delete(id)).await
    }

    pub async fn select(&self, id: Option<TaskId>) {
        let mut sync = self.shared.sync.lock().await;
        sync.select(id);
        self.shared.publish(&sync);
    }

    /// Fetch the list again and rebase pending operations on it.
    ///
    /// Operations that settle while the list is being fetched keep their
    /// effect.
    pub async fn reload(&self) -> Result<()> {
        let _reloading = self.shared.reloading.lock().await;
        let mark = self.shared.sync.lock().await.begin_rebase();

        let list = self.shared.service.list().await?;
        debug!(todos = list.len(), "list reloaded");

        let mut sync = self.shared.sync.lock().await;
        sync.rebase(mark, list);
        self.shared.publish(&sync);
        Ok(())
    }

    async fn issue<F>(&self, intent: F) -> Result<PendingOp>
    where
        F: FnOnce(&mut Synchronizer) -> listsync_engine::error::Result<Issued>,
    {
        let Issued { op_id, request } = {
            let mut sync = self.shared.sync.lock().await;
            let issued = intent(&mut *sync);
            // Publish even on error: a rejected delete still clears the selection
            self.shared.publish(&sync);
            issued?
        };

        debug!(op = %op_id, ?request, "operation issued");

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let outcome = shared.service.dispatch(request).await;
            shared.settle(op_id, outcome).await
        });

        Ok(PendingOp { op_id, handle })
    }
}
