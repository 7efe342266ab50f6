//! Identity resolution for incoming requests.

mod middleware;

pub use middleware::*;
