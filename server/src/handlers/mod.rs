//! Request handlers for the todo endpoints.

mod todos;

pub use todos::*;
