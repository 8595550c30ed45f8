//! Registry
//!
//! Concurrency-safe store of registered connections (by id) and live topics
//! (by name). Each map has its own lock; reads take it shared.
//!
//! The registry owns topic lifetime: a topic that is removed or replaced is
//! closed here, which stops its delivery task.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::options::DEFAULT_QUEUE_CAPACITY;
use super::topic::Topic;
use crate::connection::SharedConnection;
use crate::utils::error::HubError;

pub struct Registry {
    connections: RwLock<HashMap<String, SharedConnection>>,
    topics: RwLock<HashMap<String, Arc<Topic>>>,
    queue_capacity: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl Registry {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            topics: RwLock::new(HashMap::new()),
            queue_capacity,
        }
    }

    /// Insert a connection, replacing any previous one with the same id.
    pub fn add_connection(&self, conn: SharedConnection) {
        self.connections
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(conn.id().to_string(), conn);
    }

    /// Remove a connection and detach it from every topic.
    ///
    /// Returns the names of topics left without subscribers.
    pub fn remove_connection(&self, id: &str) -> Vec<String> {
        self.connections
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);

        let topics = self.topics.read().unwrap_or_else(|e| e.into_inner());
        let emptied = topics
            .values()
            .filter_map(|topic| {
                topic.unsubscribe(id);
                topic.is_empty().then(|| topic.name().to_string())
            })
            .collect();
        emptied
    }

    pub fn get_connection(&self, id: &str) -> Result<SharedConnection, HubError> {
        self.connections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or(HubError::ConnectionNotFound)
    }

    /// Snapshot of every registered connection, in no particular order.
    pub fn get_all_connections(&self) -> Vec<SharedConnection> {
        self.connections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn get_topic(&self, name: &str) -> Result<Arc<Topic>, HubError> {
        self.topics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or(HubError::TopicNotFound)
    }

    /// Create a topic and start its delivery task. A previous topic under the
    /// same name is closed and replaced.
    pub fn add_topic(&self, name: &str) -> Arc<Topic> {
        let topic = Arc::new(Topic::new(name, self.queue_capacity));
        let previous = self
            .topics
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), topic.clone());
        if let Some(previous) = previous {
            previous.close();
        }
        topic
    }

    /// Remove a topic and stop its delivery task. Returns whether it existed.
    pub fn remove_topic(&self, name: &str) -> bool {
        let removed = self
            .topics
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
        match removed {
            Some(topic) => {
                topic.close();
                debug!(topic = name, "topic removed");
                true
            }
            None => false,
        }
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    /// Remove and close every topic.
    pub fn close_all(&self) {
        let drained: Vec<Arc<Topic>> = self
            .topics
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .map(|(_, topic)| topic)
            .collect();
        for topic in drained {
            topic.close();
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("connections", &self.connection_count())
            .field("topics", &self.topic_names())
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}
