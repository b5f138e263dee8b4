use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::{Duration, sleep};

use cadence_core::{
    EventKind, JobHandler, Scheduler, SchedulerConfig, Task, TaskKind, TaskSpec,
};

#[derive(Debug, Deserialize)]
struct MessagePayload {
    recipient: String,
    text: String,
}

/// Fails the first `n` attempts, then delivers. Exercises the retry path.
struct MessageHandler {
    remaining_failures: AtomicU32,
}

impl MessageHandler {
    fn new(n: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(n),
        }
    }
}

#[async_trait]
impl JobHandler for MessageHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Messaging
    }

    async fn run(&self, task: &Task) -> Result<serde_json::Value, String> {
        let payload: MessagePayload =
            serde_json::from_value(task.payload.clone()).map_err(|e| format!("json decode: {e}"))?;

        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(format!("intentional failure (left={left})"));
        }

        println!("-> {}: {}", payload.recipient, payload.text);
        Ok(serde_json::json!({ "delivered_to": payload.recipient }))
    }
}

struct DiscoveryHandler;

#[async_trait]
impl JobHandler for DiscoveryHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Discovery
    }

    async fn run(&self, task: &Task) -> Result<serde_json::Value, String> {
        println!("discovering prospects for {}", task.name);
        Ok(serde_json::json!({ "found": 3 }))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_core=info,cadence_cli=info".into()),
        )
        .init();

    // (A) Configure and wire the scheduler. State survives restarts in the
    // snapshot file; delete it for a clean demo run.
    let snapshot_path = std::env::temp_dir().join("cadence-demo.json");
    std::fs::remove_file(&snapshot_path).ok();
    let mut config = SchedulerConfig::new(snapshot_path);
    config.tick_interval = Duration::from_millis(200);

    let scheduler = Scheduler::builder(config)
        .handler(Arc::new(MessageHandler::new(2)))
        .expect("duplicate handler")
        .handler(Arc::new(DiscoveryHandler))
        .expect("duplicate handler")
        .expect_kinds(&[TaskKind::Messaging, TaskKind::Discovery])
        .build()
        .expect("handler wiring");

    scheduler
        .events()
        .subscribe(EventKind::TaskCompleted, |event| {
            println!("event: {}", serde_json::to_string(event).unwrap());
        });

    // (B) Queue work. The outreach message outranks discovery but depends
    // on it, so discovery still runs first.
    let discovery = scheduler
        .schedule(TaskSpec::new(TaskKind::Discovery, "find prospects").priority(3))
        .await;
    let outreach = scheduler
        .schedule(
            TaskSpec::new(TaskKind::Messaging, "initial outreach")
                .priority(1)
                .depends_on(discovery)
                .payload(serde_json::json!({
                    "recipient": "prospect-42",
                    "text": "hey, saw your work"
                })),
        )
        .await;
    println!("scheduled discovery={discovery} outreach={outreach}");

    // (C) Run until everything in the queue has settled.
    scheduler.start().await;
    loop {
        let status = scheduler.status().await;
        if status.counts.queued == 0 && status.counts.running == 0 {
            println!(
                "final counts: completed={} failed={} cancelled={}",
                status.counts.completed, status.counts.failed, status.counts.cancelled
            );
            break;
        }
        sleep(Duration::from_millis(50)).await;
    }

    for task in scheduler.completed().await {
        println!(
            "{}: status={:?} retries={} result={:?}",
            task.name, task.status, task.retry_count, task.result
        );
    }

    scheduler.stop().await;
}
