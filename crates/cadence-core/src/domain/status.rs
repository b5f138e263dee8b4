//! Task state machine.

use serde::{Deserialize, Serialize};

/// Task status.
///
/// Transitions are one-way:
/// - Pending -> (Waiting <-> Pending) -> Running -> Completed
/// - Pending -> ... -> Running -> Pending (retry requeue, until max_retries)
/// - Pending -> ... -> Running -> Failed (retries exhausted)
/// - Pending -> Cancelled (queued tasks only; a running task cannot be
///   cancelled mid-execution)
///
/// Waiting is cosmetic: the task stays in the pending queue and is
/// re-evaluated every tick, it only records that the resource gate or quiet
/// hours held it back last time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// In the pending queue, eligible as soon as checks pass.
    Pending,

    /// In the pending queue, held back by resources or quiet hours.
    Waiting,

    /// Promoted; its job body is executing.
    Running,

    /// Job body returned success.
    Completed,

    /// Retries exhausted (or dependency dead); terminal.
    Failed,

    /// Removed from the pending queue before execution; terminal.
    Cancelled,
}

impl TaskStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Is this task sitting in the pending queue?
    pub fn is_queued(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Waiting)
    }
}
