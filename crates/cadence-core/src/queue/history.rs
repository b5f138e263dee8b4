//! Bounded completed history.

use std::collections::VecDeque;

use crate::domain::{Task, TaskId, TaskStatus};

/// Terminal tasks, capped. Oldest entries are evicted first once the cap is
/// reached — a lossy audit trail by design, not a permanent log.
#[derive(Debug)]
pub struct CompletedHistory {
    entries: VecDeque<Task>,
    cap: usize,
}

/// What the history knows about a dependency id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyState {
    /// Present with status Completed: the gate is satisfied.
    Completed,
    /// Present but Failed or Cancelled: the dependent can never run.
    Dead,
    /// Not in the history (still queued, running, or never scheduled).
    Unknown,
}

impl CompletedHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap,
        }
    }

    pub fn from_tasks(tasks: Vec<Task>, cap: usize) -> Self {
        let mut history = Self::new(cap);
        for task in tasks {
            history.push(task);
        }
        history
    }

    /// Append a terminal task, evicting the oldest entry past the cap.
    pub fn push(&mut self, task: Task) {
        self.entries.push_back(task);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.entries.iter().find(|t| t.id == id)
    }

    pub fn dependency_state(&self, id: TaskId) -> DependencyState {
        match self.find(id) {
            Some(t) if t.status == TaskStatus::Completed => DependencyState::Completed,
            Some(_) => DependencyState::Dead,
            None => DependencyState::Unknown,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.entries.iter().filter(|t| t.status == status).count()
    }
}
