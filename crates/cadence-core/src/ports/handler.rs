//! Job execution port.
//!
//! Design intent:
//! - The engine owns state transitions (pending -> running -> ...).
//! - A handler executes the side effects for one task kind and reports
//!   success-or-failure; it gets the whole task so it can decode the
//!   payload however it likes.
//! - Failures are plain strings: the engine records them verbatim, it does
//!   not interpret them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Task, TaskKind};
use crate::error::SchedulerError;

/// A job body for one task kind.
#[async_trait]
pub trait JobHandler: Send + Sync {
    fn kind(&self) -> TaskKind;

    /// Execute the task. The returned value lands in `task.result`.
    async fn run(&self, task: &Task) -> Result<serde_json::Value, String>;
}

/// Registry of handlers (kind -> handler).
///
/// Built during initialization (mutable), used during runtime (immutable);
/// no locks needed.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TaskKind, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn JobHandler>) -> Result<(), SchedulerError> {
        let kind = handler.kind();
        if self.handlers.contains_key(&kind) {
            return Err(SchedulerError::DuplicateHandler(kind));
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    pub fn get(&self, kind: TaskKind) -> Option<&Arc<dyn JobHandler>> {
        self.handlers.get(&kind)
    }

    pub fn has(&self, kind: TaskKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for `task.kind`. A kind with no registered handler
    /// is an execution failure like any other — it goes through the same
    /// retry/fail path.
    pub async fn dispatch(&self, task: &Task) -> Result<serde_json::Value, String> {
        match self.handlers.get(&task.kind) {
            Some(handler) => handler.run(task).await,
            None => Err(format!("no handler registered for kind '{}'", task.kind)),
        }
    }
}
