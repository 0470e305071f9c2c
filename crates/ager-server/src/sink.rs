//! NotificationSink that publishes queue events onto the WebSocket broadcast.

use ager_core::domain::{ProgressDelta, QueueEvent, QueueSnapshot, Task};
use ager_core::NotificationSink;
use tokio::sync::broadcast;
use tracing::{debug, error};

pub struct BroadcastSink {
    tx: broadcast::Sender<String>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }

    fn publish(&self, event: QueueEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                error!(event = event.name(), %err, "failed to serialize queue event");
                return;
            }
        };
        // Err only means nobody is listening right now.
        if self.tx.send(json).is_err() {
            debug!(event = event.name(), "no live subscribers");
        }
    }
}

impl NotificationSink for BroadcastSink {
    fn snapshot(&self, snapshot: &QueueSnapshot) {
        self.publish(QueueEvent::QueueUpdate(snapshot.clone()));
    }

    fn progress(&self, delta: &ProgressDelta) {
        self.publish(QueueEvent::TaskProgress(*delta));
    }

    fn completed(&self, task: &Task) {
        self.publish(QueueEvent::TaskCompleted { task: task.clone() });
    }
}
