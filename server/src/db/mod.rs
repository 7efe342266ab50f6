//! Database module for PostgreSQL persistence.

mod pool;
mod sessions;
mod todos;

pub use pool::*;
pub use sessions::*;
pub use todos::*;
