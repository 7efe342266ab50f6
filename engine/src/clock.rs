//! Session-local sequence for operation ids and placeholder task ids.

use crate::{OperationId, TaskId};
use serde::{Deserialize, Serialize};

/// A monotonically increasing counter owned by one synchronizer.
///
/// Operation ids and temp task ids are drawn from the same sequence, so no
/// value is handed out twice within a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    counter: u64,
}

impl SessionClock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// The last value handed out.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Increment the counter and return the new value.
    pub fn tick(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    pub fn next_operation(&mut self) -> OperationId {
        OperationId(self.tick())
    }

    pub fn next_temp_id(&mut self) -> TaskId {
        TaskId::Temp(self.tick())
    }
}
