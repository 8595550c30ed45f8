//! Topic management
//!
//! A `Topic` holds the subscribers of one topic name, keyed by connection id
//! so duplicate subscriptions are a no-op, and owns the bounded queue and the
//! background task that delivers published payloads.
//!
//! The delivery task drains the queue in FIFO order. For each payload it
//! snapshots the subscriber set and writes to every subscriber concurrently,
//! so subscription changes during a round only affect later rounds.
//!
//! Closing a topic (explicitly, or by dropping the last handle) stops the
//! task once the round in progress has finished. Payloads still queued at
//! that point are discarded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::fanout::fan_out;
use crate::connection::SharedConnection;
use crate::utils::error::HubError;

pub type SubscriberId = String;

type Subscribers = Arc<RwLock<HashMap<SubscriberId, SharedConnection>>>;

pub struct Topic {
    name: String,
    subscribers: Subscribers,
    queue: mpsc::Sender<Bytes>,
    closed: CancellationToken,
    task: JoinHandle<()>,
}

impl Topic {
    /// Create a topic and start its delivery task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(name: &str, queue_capacity: usize) -> Self {
        let subscribers: Subscribers = Arc::default();
        let (queue, rx) = mpsc::channel(queue_capacity.max(1));
        let closed = CancellationToken::new();

        let task = tokio::spawn(deliver(
            name.to_string(),
            subscribers.clone(),
            rx,
            closed.clone(),
        ));
        debug!(topic = name, "topic created");

        Self {
            name: name.to_string(),
            subscribers,
            queue,
            closed,
            task,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a subscriber. Re-subscribing the same connection id is a no-op.
    pub fn subscribe(&self, conn: SharedConnection) {
        let id = conn.id().to_string();
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(id)
            .or_insert(conn);
    }

    pub fn unsubscribe(&self, id: &str) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue a payload for delivery.
    ///
    /// Waits while the queue is full. Returns once the payload is queued, not
    /// once it is delivered. Fails with `TopicNotFound` if the topic has been
    /// closed.
    pub async fn publish(&self, payload: Bytes) -> Result<(), HubError> {
        if self.closed.is_cancelled() {
            return Err(HubError::TopicNotFound);
        }
        self.queue
            .send(payload)
            .await
            .map_err(|_| HubError::TopicNotFound)
    }

    /// Stop the delivery task. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Whether the delivery task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Topic {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}

impl std::fmt::Debug for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("subscribers", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn deliver(
    name: String,
    subscribers: Subscribers,
    mut queue: mpsc::Receiver<Bytes>,
    closed: CancellationToken,
) {
    loop {
        let payload = tokio::select! {
            biased;
            _ = closed.cancelled() => break,
            next = queue.recv() => match next {
                Some(payload) => payload,
                None => break,
            },
        };

        let snapshot: Vec<SharedConnection> = subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();

        // the round in progress always completes, even if the topic closes
        if let Err(e) = fan_out(snapshot, payload).await {
            warn!(topic = %name, error = %e, "delivery round failed");
        }
    }
    debug!(topic = %name, "delivery task stopped");
}
