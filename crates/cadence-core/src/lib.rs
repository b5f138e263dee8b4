//! cadence-core
//!
//! A single-process, durable, priority-ordered task execution engine for
//! human-paced automation workloads.
//!
//! # Module layout
//! - **domain**: the data model (ids, kinds, the task record, statuses,
//!   lifecycle events)
//! - **queue**: the priority-ordered pending queue and the bounded
//!   completed history
//! - **ports**: trait seams to external collaborators (clock, resource
//!   gate, job handlers)
//! - **engine**: the state store, tick loop, promotion and settlement
//! - **builder**: fail-fast wiring
//! - **persist**: single-document JSON snapshotting with silent recovery
//! - **notify**: synchronous in-process event delivery
//! - **quiet**: daily quiet-hours window
//!
//! The engine assumes exactly one instance owns the snapshot file;
//! concurrent instances would race on writes and corrupt each other.

pub mod builder;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod persist;
pub mod ports;
pub mod queue;
pub mod quiet;

pub use builder::SchedulerBuilder;
pub use config::SchedulerConfig;
pub use domain::{EventKind, SchedulerEvent, Task, TaskId, TaskKind, TaskSpec, TaskStatus};
pub use engine::{QueueView, Scheduler, SchedulerCounts, StatusReport};
pub use error::SchedulerError;
pub use notify::EventBus;
pub use ports::{
    AlwaysAvailable, Clock, FixedClock, HandlerRegistry, JobHandler, ResourceGate, SystemClock,
};
pub use quiet::QuietHours;
