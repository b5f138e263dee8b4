//! Lifecycle events.
//!
//! Delivery is synchronous and in-process (see `notify`); events carry
//! enough to be useful on their own without a follow-up query.

use serde::Serialize;

use super::{TaskId, TaskKind};

/// An event emitted by the engine (or a resource monitor).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SchedulerEvent {
    #[serde(rename_all = "camelCase")]
    TaskScheduled {
        id: TaskId,
        kind: TaskKind,
        name: String,
        priority: u8,
    },
    #[serde(rename_all = "camelCase")]
    TaskStarted { id: TaskId, kind: TaskKind, name: String },
    #[serde(rename_all = "camelCase")]
    TaskCompleted { id: TaskId, kind: TaskKind, name: String },
    #[serde(rename_all = "camelCase")]
    TaskFailed {
        id: TaskId,
        kind: TaskKind,
        name: String,
        error: String,
    },
    /// Emitted by external resource monitors when a credit pool refills.
    #[serde(rename_all = "camelCase")]
    CreditsRefreshed { available: u64 },
}

/// Discriminant used for subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskScheduled,
    TaskStarted,
    TaskCompleted,
    TaskFailed,
    CreditsRefreshed,
}

impl SchedulerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SchedulerEvent::TaskScheduled { .. } => EventKind::TaskScheduled,
            SchedulerEvent::TaskStarted { .. } => EventKind::TaskStarted,
            SchedulerEvent::TaskCompleted { .. } => EventKind::TaskCompleted,
            SchedulerEvent::TaskFailed { .. } => EventKind::TaskFailed,
            SchedulerEvent::CreditsRefreshed { .. } => EventKind::CreditsRefreshed,
        }
    }
}
