//! Job categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of job categories the engine schedules.
///
/// The kind only selects which registered handler executes the task; the
/// engine never looks inside the work itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Content generation (consumes generation credits).
    Generation,
    /// Direct messaging.
    Messaging,
    /// Commenting on posts.
    Commenting,
    /// Feed/profile discovery.
    Discovery,
    /// State synchronization with a platform.
    Sync,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Generation => "generation",
            TaskKind::Messaging => "messaging",
            TaskKind::Commenting => "commenting",
            TaskKind::Discovery => "discovery",
            TaskKind::Sync => "sync",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        let s = serde_json::to_string(&TaskKind::Messaging).unwrap();
        assert_eq!(s, "\"messaging\"");
        let back: TaskKind = serde_json::from_str("\"discovery\"").unwrap();
        assert_eq!(back, TaskKind::Discovery);
    }
}
