//! Event notification.
//!
//! A callback registry keyed by event kind. Delivery is synchronous and
//! in-process; there is no durability or replay — a subscriber only sees
//! events emitted after it subscribed.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{EventKind, SchedulerEvent};

type Subscriber = Box<dyn Fn(&SchedulerEvent) + Send + Sync>;

/// Typed callback registry.
///
/// A std mutex is fine here: delivery never awaits, and the engine emits
/// outside its own state lock.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<HashMap<EventKind, Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F)
    where
        F: Fn(&SchedulerEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Deliver `event` to every subscriber of its kind, synchronously.
    pub fn emit(&self, event: SchedulerEvent) {
        let subscribers = self.subscribers.lock().unwrap();
        if let Some(list) = subscribers.get(&event.kind()) {
            for callback in list {
                callback(&event);
            }
        }
    }
}
