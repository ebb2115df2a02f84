//! Batch status transition table
//!
//! | Current   | Allowed next         |
//! |-----------|----------------------|
//! | Upcoming  | Active               |
//! | Active    | Completed, Cancelled |
//! | Completed | Active               |
//! | Cancelled | Active               |
//!
//! No status is terminal: completed and cancelled batches can be reactivated.

use crate::core::types::BatchStatus;
use crate::utils::error::{DeskError, Result};

impl BatchStatus {
    /// Statuses reachable in one step
    pub fn allowed_next(&self) -> &'static [BatchStatus] {
        match self {
            BatchStatus::Upcoming => &[BatchStatus::Active],
            BatchStatus::Active => &[BatchStatus::Completed, BatchStatus::Cancelled],
            BatchStatus::Completed => &[BatchStatus::Active],
            BatchStatus::Cancelled => &[BatchStatus::Active],
        }
    }

    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

/// Check a transition against the table
pub fn transition(from: BatchStatus, to: BatchStatus) -> Result<BatchStatus> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(DeskError::InvalidTransition { from, to })
    }
}
