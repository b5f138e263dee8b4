//! Snapshot persistence.
//!
//! One JSON document, overwritten after every mutating operation. No append
//! log, no multi-version history: persisted and in-memory state agree the
//! moment any mutating call returns. The running set is never written — a
//! restart cannot resume a truly in-flight external call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Task;
use crate::error::SchedulerError;

/// On-disk shape: two arrays, timestamps as RFC 3339 strings (chrono's
/// serde does the rehydration to structured dates on load).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub queue: Vec<Task>,
    pub completed: Vec<Task>,
}

/// File-backed snapshot store.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot, overwriting prior contents.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SchedulerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(
            path = %self.path.display(),
            queued = snapshot.queue.len(),
            completed = snapshot.completed.len(),
            "snapshot written"
        );
        Ok(())
    }

    /// Load prior state. Missing or unparsable files yield an empty
    /// snapshot — silent recovery, not a fatal error.
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            return Snapshot::default();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "snapshot unparsable, starting empty");
                    Snapshot::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "snapshot unreadable, starting empty");
                Snapshot::default()
            }
        }
    }
}
