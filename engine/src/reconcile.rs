//! Reconciling the pending log with the confirmed baseline.
//!
//! The visible list is never mutated directly. It is rebuilt by folding the
//! pending log over the baseline:
//!
//! 1. Start from a copy of the baseline
//! 2. Apply every pending diff in issue order
//!
//! Rolling back an operation removes its diff from the log; confirming one
//! marks it. Confirmed diffs at the head of the log are then compacted into
//! the baseline. A confirmed diff behind an in-flight one stays where it is,
//! so the fold order never changes and no completion can reorder another
//! operation's effect.

use crate::{PendingMutation, Task};

/// Build the visible list from the baseline and the pending log.
pub fn fold(baseline: &[Task], pending: &[PendingMutation]) -> Vec<Task> {
    let mut visible = baseline.to_vec();
    for entry in pending {
        if let Some(mutation) = &entry.mutation {
            mutation.apply(&mut visible);
        }
    }
    visible
}

/// Move the confirmed prefix of the log into the baseline.
///
/// Returns the compacted entries.
pub fn compact(
    baseline: &mut Vec<Task>,
    pending: &mut Vec<PendingMutation>,
) -> Vec<PendingMutation> {
    let settled = pending.iter().take_while(|p| !p.is_in_flight()).count();
    let compacted: Vec<_> = pending.drain(..settled).collect();

    for entry in &compacted {
        if let Some(mutation) = &entry.mutation {
            mutation.apply(baseline);
        }
    }

    compacted
}
