//! Scheduler construction and wiring.
//!
//! Fail-fast: `expect_kinds` lets the caller declare which job categories
//! it intends to schedule, and `build` refuses to produce a scheduler with
//! any of them missing a handler — a misconfigured deployment fails at
//! startup instead of at the first dispatch.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::engine::Scheduler;
use crate::error::SchedulerError;
use crate::domain::TaskKind;
use crate::ports::{AlwaysAvailable, Clock, HandlerRegistry, JobHandler, ResourceGate, SystemClock};

pub struct SchedulerBuilder {
    config: SchedulerConfig,
    registry: HandlerRegistry,
    gate: Arc<dyn ResourceGate>,
    clock: Arc<dyn Clock>,
    expected: Vec<TaskKind>,
}

impl SchedulerBuilder {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(),
            gate: Arc::new(AlwaysAvailable),
            clock: Arc::new(SystemClock),
            expected: Vec::new(),
        }
    }

    /// Register the job body for one task kind.
    pub fn handler(mut self, handler: Arc<dyn JobHandler>) -> Result<Self, SchedulerError> {
        self.registry.register(handler)?;
        Ok(self)
    }

    /// Inject the resource gate (defaults to [`AlwaysAvailable`]).
    pub fn gate(mut self, gate: Arc<dyn ResourceGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Inject the clock (defaults to [`SystemClock`]).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Declare kinds that must have a handler by build time.
    pub fn expect_kinds(mut self, kinds: &[TaskKind]) -> Self {
        self.expected.extend_from_slice(kinds);
        self
    }

    /// Validate the wiring and construct the scheduler, restoring any
    /// prior state from the configured snapshot path.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let missing: Vec<TaskKind> = self
            .expected
            .iter()
            .copied()
            .filter(|kind| !self.registry.has(*kind))
            .collect();
        if !missing.is_empty() {
            return Err(SchedulerError::MissingHandlers(missing));
        }
        Ok(Scheduler::from_parts(
            self.config,
            Arc::new(self.registry),
            self.gate,
            self.clock,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use async_trait::async_trait;

    struct MessagingHandler;

    #[async_trait]
    impl JobHandler for MessagingHandler {
        fn kind(&self) -> TaskKind {
            TaskKind::Messaging
        }

        async fn run(&self, _task: &Task) -> Result<serde_json::Value, String> {
            Ok(serde_json::Value::Null)
        }
    }

    fn config(name: &str) -> SchedulerConfig {
        SchedulerConfig::new(
            std::env::temp_dir().join(format!("cadence-builder-{name}-{}.json", std::process::id())),
        )
    }

    #[test]
    fn build_succeeds_when_expected_kinds_are_registered() {
        let scheduler = SchedulerBuilder::new(config("ok"))
            .handler(Arc::new(MessagingHandler))
            .unwrap()
            .expect_kinds(&[TaskKind::Messaging])
            .build();
        assert!(scheduler.is_ok());
    }

    #[test]
    fn build_fails_on_missing_expected_kind() {
        let err = SchedulerBuilder::new(config("missing"))
            .handler(Arc::new(MessagingHandler))
            .unwrap()
            .expect_kinds(&[TaskKind::Messaging, TaskKind::Generation])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::MissingHandlers(missing) if missing == vec![TaskKind::Generation]
        ));
    }

    #[test]
    fn build_without_expectations_is_fine() {
        assert!(SchedulerBuilder::new(config("none")).build().is_ok());
    }
}
