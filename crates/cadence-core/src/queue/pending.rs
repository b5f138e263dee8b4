//! Priority-ordered pending queue.

use crate::domain::{Task, TaskId};

/// The pending queue.
///
/// Invariant: sorted by ascending priority (1 = highest runs first), stable
/// FIFO within equal priority. Insertion is O(n) — queue sizes here are
/// human-paced, not high-throughput.
#[derive(Debug, Default)]
pub struct PendingQueue {
    tasks: Vec<Task>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Restore from a persisted snapshot; the persisted order is the queue
    /// order, so no re-sort happens here.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Insert preserving the sort invariant: position is the first index
    /// whose priority is strictly greater, i.e. after the last entry of
    /// equal priority.
    pub fn insert(&mut self, task: Task) {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.priority > task.priority)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(pos, task);
    }

    /// Remove by id (used by cancel and by dead-dependency sweeps).
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Remove by position (used when promoting the winning task).
    pub fn remove_at(&mut self, idx: usize) -> Task {
        self.tasks.remove(idx)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Task> {
        self.tasks.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
