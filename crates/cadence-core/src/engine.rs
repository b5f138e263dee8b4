//! Scheduler engine: state store, tick loop, promotion and settlement.
//!
//! Design:
//! - One `tokio::sync::Mutex` guards the whole state store. Every mutating
//!   path (schedule, cancel, tick promotion, settlement) takes the lock,
//!   mutates, and writes the snapshot before releasing it, so disk and
//!   memory always agree the moment a call returns.
//! - Events are emitted outside the lock; delivery is synchronous.
//! - Job bodies run on spawned tasks. The engine only tracks membership in
//!   the running set; it enforces no timeout, so a hung handler occupies a
//!   concurrency slot until it returns.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::config::SchedulerConfig;
use crate::domain::{SchedulerEvent, Task, TaskId, TaskSpec, TaskStatus};
use crate::notify::EventBus;
use crate::persist::{Snapshot, SnapshotStore};
use crate::ports::{Clock, HandlerRegistry, ResourceGate};
use crate::queue::{CompletedHistory, DependencyState, PendingQueue};

/// Loop lifecycle: Stopped -> Running -> (Paused <-> Running) -> Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Paused,
}

/// Per-state task counts for status reports.
///
/// `queued` counts everything in the pending queue, including the `waiting`
/// subset reported separately.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SchedulerCounts {
    pub queued: usize,
    pub waiting: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Loop is started (running or paused).
    pub running: bool,
    pub paused: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub counts: SchedulerCounts,
    /// Whatever the resource gate reports about the outside world.
    pub resources: serde_json::Value,
}

/// Ordered view of the pending queue plus the running set.
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    pub pending: Vec<Task>,
    pub running: Vec<Task>,
}

struct EngineState {
    pending: PendingQueue,
    running: HashMap<TaskId, Task>,
    completed: CompletedHistory,
    loop_state: LoopState,
    started_at: Option<DateTime<Utc>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    loop_handle: Option<JoinHandle<()>>,
}

struct EngineInner {
    state: Mutex<EngineState>,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    gate: Arc<dyn ResourceGate>,
    registry: Arc<HandlerRegistry>,
    bus: Arc<EventBus>,
    store: SnapshotStore,
}

/// The scheduler. Cheap to clone; clones share one state store.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Start building a scheduler around `config`.
    pub fn builder(config: SchedulerConfig) -> crate::builder::SchedulerBuilder {
        crate::builder::SchedulerBuilder::new(config)
    }

    pub(crate) fn from_parts(
        config: SchedulerConfig,
        registry: Arc<HandlerRegistry>,
        gate: Arc<dyn ResourceGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = SnapshotStore::new(&config.snapshot_path);
        let snapshot = store.load();
        if !snapshot.queue.is_empty() || !snapshot.completed.is_empty() {
            tracing::info!(
                queued = snapshot.queue.len(),
                completed = snapshot.completed.len(),
                "restored state from snapshot"
            );
        }
        let state = EngineState {
            pending: PendingQueue::from_tasks(snapshot.queue),
            running: HashMap::new(),
            completed: CompletedHistory::from_tasks(snapshot.completed, config.history_cap),
            loop_state: LoopState::Stopped,
            started_at: None,
            shutdown_tx: None,
            loop_handle: None,
        };
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(state),
                config,
                clock,
                gate,
                registry,
                bus: Arc::new(EventBus::new()),
                store,
            }),
        }
    }

    /// Insert a new task into the pending queue at its priority position,
    /// snapshot, and emit `TaskScheduled`. Never errors for task-level
    /// conditions; persistence failures are logged and the in-memory state
    /// stays authoritative.
    pub async fn schedule(&self, spec: TaskSpec) -> TaskId {
        let now = self.inner.clock.now();
        let id = TaskId::generate(now);
        let task = Task::from_spec(spec, id, now, self.inner.config.default_max_retries);
        let event = SchedulerEvent::TaskScheduled {
            id,
            kind: task.kind,
            name: task.name.clone(),
            priority: task.priority,
        };
        {
            let mut st = self.inner.state.lock().await;
            tracing::info!(task = %id, name = %task.name, priority = task.priority, "task scheduled");
            st.pending.insert(task);
            self.inner.persist(&st);
        }
        self.inner.bus.emit(event);
        id
    }

    /// Cancel a queued task. Running or unknown ids return false: the job
    /// body is an opaque external call with no cancellation channel, so
    /// mid-flight cancellation is deliberately unsupported.
    pub async fn cancel(&self, id: TaskId) -> bool {
        let mut st = self.inner.state.lock().await;
        match st.pending.remove(id) {
            Some(mut task) => {
                task.mark_cancelled(self.inner.clock.now());
                tracing::info!(task = %id, name = %task.name, "task cancelled");
                st.completed.push(task);
                self.inner.persist(&st);
                true
            }
            None => false,
        }
    }

    /// Start the tick loop. Idempotent while running; resumes if paused.
    pub async fn start(&self) {
        let mut st = self.inner.state.lock().await;
        match st.loop_state {
            LoopState::Running => {}
            LoopState::Paused => st.loop_state = LoopState::Running,
            LoopState::Stopped => {
                let (tx, rx) = watch::channel(false);
                st.loop_state = LoopState::Running;
                st.started_at = Some(self.inner.clock.now());
                st.shutdown_tx = Some(tx);
                st.loop_handle = Some(spawn_loop(Arc::clone(&self.inner), rx));
                tracing::info!(interval = ?self.inner.config.tick_interval, "scheduler started");
            }
        }
    }

    /// Stop the loop and join it. In-flight job bodies are not cancelled;
    /// their settlement still lands in the state store.
    pub async fn stop(&self) {
        let handle = {
            let mut st = self.inner.state.lock().await;
            if st.loop_state == LoopState::Stopped {
                return;
            }
            st.loop_state = LoopState::Stopped;
            if let Some(tx) = st.shutdown_tx.take() {
                let _ = tx.send(true);
            }
            st.loop_handle.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        tracing::info!("scheduler stopped");
    }

    /// Halt promotion while leaving running tasks to finish.
    pub async fn pause(&self) {
        let mut st = self.inner.state.lock().await;
        if st.loop_state == LoopState::Running {
            st.loop_state = LoopState::Paused;
            tracing::info!("scheduler paused");
        }
    }

    /// Resume promotion; on a stopped scheduler this implicitly starts it.
    pub async fn resume(&self) {
        let need_start = {
            let mut st = self.inner.state.lock().await;
            match st.loop_state {
                LoopState::Paused => {
                    st.loop_state = LoopState::Running;
                    false
                }
                LoopState::Running => false,
                LoopState::Stopped => true,
            }
        };
        if need_start {
            self.start().await;
        }
    }

    /// One evaluation-and-promotion pass. The loop calls this every
    /// interval; it is public so callers (and tests) can drive the engine
    /// deterministically.
    pub async fn tick(&self) {
        tick_inner(&self.inner).await;
    }

    pub async fn status(&self) -> StatusReport {
        let st = self.inner.state.lock().await;
        let mut counts = SchedulerCounts {
            queued: st.pending.len(),
            running: st.running.len(),
            completed: st.completed.count_with_status(TaskStatus::Completed),
            failed: st.completed.count_with_status(TaskStatus::Failed),
            cancelled: st.completed.count_with_status(TaskStatus::Cancelled),
            ..Default::default()
        };
        counts.waiting = st
            .pending
            .iter()
            .filter(|t| t.status == TaskStatus::Waiting)
            .count();
        StatusReport {
            running: st.loop_state != LoopState::Stopped,
            paused: st.loop_state == LoopState::Paused,
            started_at: st.started_at,
            counts,
            resources: self.inner.gate.snapshot(),
        }
    }

    pub async fn queue(&self) -> QueueView {
        let st = self.inner.state.lock().await;
        QueueView {
            pending: st.pending.iter().cloned().collect(),
            running: st.running.values().cloned().collect(),
        }
    }

    /// Bounded completed history, oldest first.
    pub async fn completed(&self) -> Vec<Task> {
        let st = self.inner.state.lock().await;
        st.completed.iter().cloned().collect()
    }

    /// The event bus: subscribe to lifecycle events, or emit
    /// resource-related events from an external monitor.
    pub fn events(&self) -> &EventBus {
        &self.inner.bus
    }
}

impl EngineInner {
    fn persist(&self, st: &EngineState) {
        let snapshot = Snapshot {
            queue: st.pending.iter().cloned().collect(),
            completed: st.completed.iter().cloned().collect(),
        };
        if let Err(e) = self.store.save(&snapshot) {
            tracing::warn!(error = %e, "snapshot save failed; in-memory state remains authoritative");
        }
    }
}

fn spawn_loop(inner: Arc<EngineInner>, mut shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(inner.config.tick_interval);
        // The first interval tick completes immediately; consume it so the
        // first evaluation happens one period after start.
        interval.tick().await;
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    tick_inner(&inner).await;
                }
            }
        }
    })
}

async fn tick_inner(inner: &Arc<EngineInner>) {
    let now = inner.clock.now();

    let (dead, promoted) = {
        let mut st = inner.state.lock().await;
        if st.loop_state != LoopState::Running {
            return;
        }

        let dead = sweep_dead_dependencies(&mut st, now);

        let promoted = if st.running.len() < inner.config.max_concurrent {
            find_next_ready(&mut st, now, inner).map(|idx| {
                let mut task = st.pending.remove_at(idx);
                task.mark_started(now);
                st.running.insert(task.id, task.clone());
                task
            })
        } else {
            None
        };

        if !dead.is_empty() || promoted.is_some() {
            inner.persist(&st);
        }
        (dead, promoted)
    };

    for task in &dead {
        tracing::warn!(task = %task.id, name = %task.name, error = ?task.error, "dependency dead, task failed");
        inner.bus.emit(SchedulerEvent::TaskFailed {
            id: task.id,
            kind: task.kind,
            name: task.name.clone(),
            error: task.error.clone().unwrap_or_default(),
        });
    }

    if let Some(task) = promoted {
        tracing::info!(task = %task.id, name = %task.name, kind = %task.kind, "task started");
        inner.bus.emit(SchedulerEvent::TaskStarted {
            id: task.id,
            kind: task.kind,
            name: task.name.clone(),
        });
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let outcome = inner.registry.dispatch(&task).await;
            settle(&inner, task.id, outcome).await;
        });
    }
}

/// Fail pending tasks whose dependency reached a terminal state other than
/// `completed`. Waiting forever on an observably dead dependency would be
/// invisible to callers; failing surfaces it through status and events.
fn sweep_dead_dependencies(st: &mut EngineState, now: DateTime<Utc>) -> Vec<Task> {
    let broken: Vec<(TaskId, TaskId)> = st
        .pending
        .iter()
        .filter_map(|t| {
            t.dependencies
                .iter()
                .find(|&&dep| st.completed.dependency_state(dep) == DependencyState::Dead)
                .map(|&dep| (t.id, dep))
        })
        .collect();

    let mut failed = Vec::new();
    for (id, dep) in broken {
        if let Some(mut task) = st.pending.remove(id) {
            task.mark_failed(now, format!("dependency {dep} ended without completing"));
            st.completed.push(task.clone());
            failed.push(task);
        }
    }
    failed
}

/// Scan the pending queue in priority order and return the index of the
/// first eligible task: due, dependencies completed, resources available,
/// outside quiet hours. Tasks held back only by resources or quiet hours
/// are marked waiting; they stay queued and get re-evaluated next tick.
fn find_next_ready(st: &mut EngineState, now: DateTime<Utc>, inner: &EngineInner) -> Option<usize> {
    let quiet = inner
        .config
        .quiet_hours
        .is_some_and(|q| q.contains(now.hour()));

    let mut winner = None;
    let mut held_back = Vec::new();
    for (idx, task) in st.pending.iter().enumerate() {
        if task.scheduled_for > now {
            continue;
        }
        let deps_completed = task
            .dependencies
            .iter()
            .all(|&dep| st.completed.dependency_state(dep) == DependencyState::Completed);
        if !deps_completed {
            continue;
        }
        if quiet || !inner.gate.is_available(task) {
            held_back.push(idx);
            continue;
        }
        winner = Some(idx);
        break;
    }

    for idx in held_back {
        if let Some(task) = st.pending.get_mut(idx) {
            task.mark_waiting();
        }
    }
    winner
}

/// Record the outcome of one attempt: success completes the task, failure
/// requeues it at its priority position until retries run out.
async fn settle(inner: &Arc<EngineInner>, id: TaskId, outcome: Result<serde_json::Value, String>) {
    let now = inner.clock.now();
    let event = {
        let mut st = inner.state.lock().await;
        let Some(mut task) = st.running.remove(&id) else {
            return;
        };
        let event = match outcome {
            Ok(result) => {
                task.mark_completed(now, result);
                tracing::info!(task = %id, name = %task.name, "task completed");
                let event = SchedulerEvent::TaskCompleted {
                    id,
                    kind: task.kind,
                    name: task.name.clone(),
                };
                st.completed.push(task);
                Some(event)
            }
            Err(error) => {
                if task.retry_count + 1 < task.max_retries {
                    task.requeue_for_retry();
                    tracing::warn!(
                        task = %id,
                        name = %task.name,
                        retry = task.retry_count,
                        max = task.max_retries,
                        error = %error,
                        "attempt failed, requeued"
                    );
                    st.pending.insert(task);
                    None
                } else {
                    task.retry_count += 1;
                    task.mark_failed(now, error.clone());
                    tracing::warn!(task = %id, name = %task.name, error = %error, "retries exhausted, task failed");
                    let event = SchedulerEvent::TaskFailed {
                        id,
                        kind: task.kind,
                        name: task.name.clone(),
                        error,
                    };
                    st.completed.push(task);
                    Some(event)
                }
            }
        };
        inner.persist(&st);
        event
    };
    if let Some(event) = event {
        inner.bus.emit(event);
    }
}
