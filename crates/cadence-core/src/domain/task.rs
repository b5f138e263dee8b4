//! Task record: the single source of truth for one unit of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskKind, TaskStatus};

/// Priority range: 1 is highest, 5 is lowest.
pub const PRIORITY_MIN: u8 = 1;
pub const PRIORITY_MAX: u8 = 5;
pub const PRIORITY_DEFAULT: u8 = 3;

/// A scheduled task.
///
/// Design:
/// - This record is the single source of truth for task state.
/// - Only the engine mutates it (status/timestamps/retry count), and only
///   through the transition methods below; `started_at` and `completed_at`
///   are stamped exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, assigned at creation, immutable.
    pub id: TaskId,

    /// Which registered job body executes this task.
    pub kind: TaskKind,

    /// Human-readable label, not used for identity.
    pub name: String,

    /// Optional target platform tag, read by the resource gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// 1 (highest) through 5 (lowest); decides queue position.
    pub priority: u8,

    /// Not eligible to run before this instant.
    pub scheduled_for: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Ids that must be terminally completed before this task is eligible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,

    /// Opaque hint for the resource gate; the engine never reads inside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<serde_json::Value>,

    pub status: TaskStatus,

    pub retry_count: u32,

    pub max_retries: u32,

    /// Last failure message; only present once status is Failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Opaque value returned by the job body on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Opaque input handed to the job body.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Task {
    /// Materialize a submission into a record, filling defaults.
    pub fn from_spec(spec: TaskSpec, id: TaskId, now: DateTime<Utc>, default_max_retries: u32) -> Self {
        Self {
            id,
            kind: spec.kind,
            name: spec.name,
            platform: spec.platform,
            priority: spec
                .priority
                .unwrap_or(PRIORITY_DEFAULT)
                .clamp(PRIORITY_MIN, PRIORITY_MAX),
            scheduled_for: spec.scheduled_for.unwrap_or(now),
            created_at: now,
            started_at: None,
            completed_at: None,
            dependencies: spec.dependencies,
            resource_requirements: spec.resource_requirements,
            status: TaskStatus::Pending,
            retry_count: 0,
            max_retries: spec.max_retries.unwrap_or(default_max_retries),
            error: None,
            result: None,
            payload: spec.payload,
        }
    }

    /// Pending -> Running.
    pub fn mark_started(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Running;
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Running -> Completed.
    pub fn mark_completed(&mut self, now: DateTime<Utc>, result: serde_json::Value) {
        self.status = TaskStatus::Completed;
        self.result = Some(result);
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    /// Running -> Failed (retries exhausted), or Pending -> Failed when a
    /// dependency is terminally dead.
    pub fn mark_failed(&mut self, now: DateTime<Utc>, error: String) {
        self.status = TaskStatus::Failed;
        self.error = Some(error);
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    /// Pending -> Cancelled.
    pub fn mark_cancelled(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Cancelled;
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    /// Running -> Pending, after a failed attempt with retries left.
    /// No backoff is computed here; callers wanting a delay encode it via
    /// `scheduled_for` up front.
    pub fn requeue_for_retry(&mut self) {
        self.status = TaskStatus::Pending;
        self.retry_count += 1;
        self.error = None;
    }

    /// Resource gate or quiet hours held this task back this tick.
    pub fn mark_waiting(&mut self) {
        self.status = TaskStatus::Waiting;
    }
}

/// Submission for [`Task`]: required kind + name, everything else optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl TaskSpec {
    pub fn new(kind: TaskKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            priority: None,
            platform: None,
            scheduled_for: None,
            dependencies: Vec::new(),
            resource_requirements: None,
            max_retries: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn scheduled_for(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(at);
        self
    }

    pub fn depends_on(mut self, id: TaskId) -> Self {
        self.dependencies.push(id);
        self
    }

    pub fn resource_requirements(mut self, req: serde_json::Value) -> Self {
        self.resource_requirements = Some(req);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn task(spec: TaskSpec) -> Task {
        let t = now();
        Task::from_spec(spec, TaskId::generate(t), t, 3)
    }

    #[test]
    fn defaults_fill_in() {
        let t = task(TaskSpec::new(TaskKind::Messaging, "dm"));
        assert_eq!(t.priority, PRIORITY_DEFAULT);
        assert_eq!(t.max_retries, 3);
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.scheduled_for, t.created_at);
        assert!(t.started_at.is_none());
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn priority_is_clamped() {
        let t = task(TaskSpec::new(TaskKind::Sync, "s").priority(0));
        assert_eq!(t.priority, PRIORITY_MIN);
        let t = task(TaskSpec::new(TaskKind::Sync, "s").priority(9));
        assert_eq!(t.priority, PRIORITY_MAX);
    }

    #[test]
    fn started_and_completed_are_stamped_once() {
        let mut t = task(TaskSpec::new(TaskKind::Discovery, "scan"));
        let t1 = now();
        t.mark_started(t1);
        let first_start = t.started_at;
        t.mark_started(t1 + chrono::Duration::seconds(5));
        assert_eq!(t.started_at, first_start);

        let t2 = now();
        t.mark_completed(t2, serde_json::json!({"ok": true}));
        let first_done = t.completed_at;
        t.mark_failed(t2 + chrono::Duration::seconds(5), "late".into());
        assert_eq!(t.completed_at, first_done);
    }

    #[test]
    fn requeue_clears_error_and_counts_attempt() {
        let mut t = task(TaskSpec::new(TaskKind::Generation, "gen"));
        t.mark_started(now());
        t.requeue_for_retry();
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.retry_count, 1);
        assert!(t.error.is_none());
    }

    #[test]
    fn failed_carries_error() {
        let mut t = task(TaskSpec::new(TaskKind::Commenting, "c"));
        t.mark_started(now());
        t.mark_failed(now(), "boom".into());
        assert_eq!(t.status, TaskStatus::Failed);
        assert_eq!(t.error.as_deref(), Some("boom"));
    }
}
