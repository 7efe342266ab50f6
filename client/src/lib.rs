//! # listsync client
//!
//! Drives a [`listsync_engine::Synchronizer`] against a persistence service.
//!
//! ```no_run
//! use listsync_client::{HttpPersistence, Session};
//! use listsync_engine::TaskData;
//!
//! # async fn run() -> listsync_client::Result<()> {
//! let service = HttpPersistence::builder("http://localhost:3000")
//!     .token("session-token")
//!     .build()?;
//! let session = Session::start(service).await?;
//!
//! // Visible at once; the create runs in the background
//! let op = session.add(TaskData::new("Call mom")).await?;
//! assert_eq!(session.view().todos[0].text, "Call mom");
//!
//! let completion = op.settled().await?;
//! if let Some(text) = completion.restored_text {
//!     println!("could not save {text:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod memory;
pub mod service;
pub mod session;

pub use error::{ClientError, Result};
pub use http::{HttpPersistence, HttpPersistenceBuilder};
pub use memory::InMemoryPersistence;
pub use service::PersistenceService;
pub use session::{PendingOp, Session};
