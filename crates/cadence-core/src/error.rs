use thiserror::Error;

use crate::domain::TaskKind;

/// Library-level errors.
///
/// Task-level failures never surface here: the engine reports them through
/// task status, the `error` field, and `TaskFailed` events.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("duplicate handler for kind '{0}'")]
    DuplicateHandler(TaskKind),

    #[error("missing handlers for kinds: {0:?}")]
    MissingHandlers(Vec<TaskKind>),

    #[error("snapshot io: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("snapshot encode: {0}")]
    SnapshotEncode(#[from] serde_json::Error),
}
