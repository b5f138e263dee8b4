//! Task identifiers.
//!
//! Ids are ULIDs: time-sortable, generated without coordination, and
//! 128-bit. The timestamp half comes from the injected clock so tests with
//! a fixed clock get deterministic ordering; the entropy half is random.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Opaque unique identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Ulid);

impl TaskId {
    /// Mint a fresh id with the timestamp half taken from `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let millis = now.timestamp_millis().max(0) as u64;
        Self(Ulid::from_parts(millis, rand::random()))
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for TaskId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_uses_task_prefix() {
        let id = TaskId::generate(Utc::now());
        assert!(id.to_string().starts_with("task-"));
    }

    #[test]
    fn ids_from_later_clock_sort_later() {
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();

        let id1 = TaskId::generate(t1);
        let id2 = TaskId::generate(t2);
        assert!(id1 < id2);
    }

    #[test]
    fn serde_roundtrip() {
        let id = TaskId::generate(Utc::now());
        let s = serde_json::to_string(&id).unwrap();
        let back: TaskId = serde_json::from_str(&s).unwrap();
        assert_eq!(id, back);
    }
}
