//! # listsync engine
//!
//! An optimistic list synchronizer for a per-user to-do list.
//!
//! The engine keeps the list a user sees in step with a remote persistence
//! service that is the sole source of truth. User intents are applied
//! immediately as speculative diffs, and each one is confirmed or rolled
//! back when its remote call resolves.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never talks to the network; a driver sends the
//!   [`Request`]s it issues and feeds back the outcomes
//! - **Overlay, not snapshots**: the visible list is the confirmed baseline
//!   with the pending diffs folded over it, so a rollback removes exactly one
//!   diff and never restores a stale copy of the list
//! - **Deterministic**: the same intents and outcomes always give the same
//!   list
//!
//! ## Core Concepts
//!
//! ### Tasks
//!
//! A [`Task`] has an id, a text of 1-250 characters, a completion flag and a
//! server-assigned creation time. Speculative tasks carry a
//! [`TaskId::Temp`] placeholder drawn from a session counter; it is never
//! reused and never sent to the server.
//!
//! ### Mutations
//!
//! Every intent becomes a [`Mutation`] in the pending log:
//! - [`Mutation::Add`] - prepend a new task
//! - [`Mutation::Edit`] - patch fields of one task
//! - [`Mutation::Delete`] - remove one task
//!
//! ### Reconciliation
//!
//! [`Synchronizer::complete`] settles an operation. Failures remove the
//! diff; successes mark it confirmed, and the confirmed head of the log is
//! compacted into the baseline (see [`reconcile`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use listsync_engine::{Failure, Request, Synchronizer, Task, TaskData};
//!
//! // 1. Seed with the list fetched at session start
//! let mut sync = Synchronizer::new(vec![Task::new("1", "Buy milk", false, 1_706_745_600_000)]);
//!
//! // 2. Apply an intent; the list changes before any round trip
//! let issued = sync.add(TaskData::new("Call mom")).unwrap();
//! assert_eq!(sync.todos_count(), 2);
//! assert!(sync.visible()[0].is_speculative());
//! assert!(matches!(issued.request, Request::Create(_)));
//!
//! // 3. Feed back the outcome of the remote call
//! let completion = sync
//!     .complete(issued.op_id, Err(Failure::transport("Network error")))
//!     .unwrap();
//!
//! assert_eq!(sync.todos_count(), 1);
//! assert_eq!(completion.restored_text.as_deref(), Some("Call mom"));
//! assert_eq!(completion.notification.unwrap().message, "Network error");
//! ```

pub mod clock;
pub mod error;
pub mod mutation;
pub mod notification;
pub mod outcome;
pub mod reconcile;
pub mod snapshot;
pub mod synchronizer;
pub mod task;
pub mod validation;
pub mod wire;

// Re-export main types at crate root
pub use clock::SessionClock;
pub use error::Error;
pub use mutation::{Intent, Mutation, MutationStatus, OperationId, PendingMutation, Request};
pub use notification::{Level, Notification, UndoAction};
pub use outcome::{Ack, Failure, FailureKind, Outcome};
pub use snapshot::ListSnapshot;
pub use synchronizer::{Completion, Issued, RebaseMark, Synchronizer};
pub use task::{Task, TaskData, TaskId, TaskPatch};
pub use validation::MAX_TEXT_CHARS;
pub use wire::{ApiResponse, TodoPayload, TodoRecord};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
