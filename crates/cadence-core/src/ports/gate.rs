//! Resource gate port.
//!
//! The gate answers "can this task run right now?" against external
//! constraints: credit balances, platform login/cooldown state, whatever
//! the deployment monitors. The engine treats both the gate and a task's
//! `resource_requirements` as opaque — it never assumes specific fields
//! (such as "credits") are meaningful.

use crate::domain::Task;

pub trait ResourceGate: Send + Sync {
    /// May `task` run right now? A `false` is a soft wait, never an error:
    /// the task is marked waiting and re-checked every tick.
    fn is_available(&self, task: &Task) -> bool;

    /// Free-form view of the current resource situation for status reports.
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Default gate: everything may run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl ResourceGate for AlwaysAvailable {
    fn is_available(&self, _task: &Task) -> bool {
        true
    }
}
