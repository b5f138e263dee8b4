//! Scheduler configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::quiet::QuietHours;

/// Injected configuration; callers construct one and hand it to the
/// builder instead of relying on any ambient default instance.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Where the state snapshot lives. The file is overwritten after every
    /// mutating operation; exactly one scheduler instance may own it.
    pub snapshot_path: PathBuf,

    /// Concurrency ceiling for running tasks. Defaults to 1: conservative,
    /// detection-avoidant pacing beats throughput for this workload.
    pub max_concurrent: usize,

    /// Default retry budget for tasks that do not override it.
    pub default_max_retries: u32,

    /// Completed-history cap; oldest entries are evicted past it.
    pub history_cap: usize,

    /// Period of the scheduler loop.
    pub tick_interval: Duration,

    /// Optional daily window during which nothing is promoted.
    pub quiet_hours: Option<QuietHours>,
}

impl SchedulerConfig {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            max_concurrent: 1,
            default_max_retries: 3,
            history_cap: 200,
            tick_interval: Duration::from_secs(1),
            quiet_hours: None,
        }
    }
}
