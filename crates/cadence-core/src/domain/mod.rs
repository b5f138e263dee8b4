//! Domain model (ids, kinds, the task record, statuses, events).

pub mod events;
pub mod ids;
pub mod kind;
pub mod status;
pub mod task;

pub use events::{EventKind, SchedulerEvent};
pub use ids::TaskId;
pub use kind::TaskKind;
pub use status::TaskStatus;
pub use task::{PRIORITY_DEFAULT, PRIORITY_MAX, PRIORITY_MIN, Task, TaskSpec};
