//! Hub engine
//!
//! `Hub` is the public entry point. Every operation validates its arguments,
//! runs the matching middleware hooks, and only then touches the registry or
//! a topic, so a rejected operation leaves no trace. Calls that fail
//! validation (empty topic name, connection without id, topic outside the
//! allow-list) never reach the middleware.
//!
//! Concurrency notes:
//! - All methods take `&self`; share a hub with `Arc<Hub>`.
//! - Subscribe, unsubscribe and connection removal serialize on a topology
//!   lock so that garbage-collecting an empty topic can never race a
//!   concurrent subscribe into the topic being removed.
//! - `publish` only queues; delivery happens on the topic's own task.
//!   `broadcast_to_all` writes to every connection itself and waits.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::debug;

use super::fanout::fan_out;
use super::options::Options;
use super::registry::Registry;
use crate::connection::{Connection, SharedConnection};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::utils::error::HubError;

/// Middleware hooks only see calls whose arguments passed validation.
pub struct Hub {
    registry: Registry,
    middleware: MiddlewareChain,
    allowed_topics: Option<HashSet<String>>,
    topology: Mutex<()>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Hub {
    pub fn new(options: Options) -> Self {
        let registry = Registry::new(options.queue_capacity);
        Self::with_registry(registry, options)
    }

    /// Build a hub around an existing registry. The registry's own queue
    /// capacity wins over `options.queue_capacity`.
    pub fn with_registry(registry: Registry, options: Options) -> Self {
        let allowed_topics = if options.allowed_topics.is_empty() {
            None
        } else {
            Some(options.allowed_topics.into_iter().collect())
        };

        Self {
            registry,
            middleware: MiddlewareChain::new(),
            allowed_topics,
            topology: Mutex::new(()),
        }
    }

    /// Append a middleware to the chain.
    pub fn use_middleware(&self, middleware: Arc<dyn Middleware>) {
        self.middleware.add(middleware);
    }

    pub fn add_connection(&self, conn: &SharedConnection) -> Result<(), HubError> {
        ensure_identified(conn.as_ref())?;
        self.middleware.run(|m| m.on_add_connection(conn.as_ref()))?;

        self.registry.add_connection(conn.clone());
        debug!(conn = conn.id(), "connection added");
        Ok(())
    }

    /// Unregister a connection and detach it from every topic. Topics left
    /// without subscribers are removed.
    pub fn remove_connection(&self, conn: &SharedConnection) -> Result<(), HubError> {
        ensure_identified(conn.as_ref())?;
        self.middleware.run(|m| m.on_remove_connection(conn.as_ref()))?;

        let _topology = self.topology.lock().unwrap_or_else(|e| e.into_inner());
        for name in self.registry.remove_connection(conn.id()) {
            self.registry.remove_topic(&name);
        }
        debug!(conn = conn.id(), "connection removed");
        Ok(())
    }

    /// Subscribe `conn` to `topic`, creating the topic on first use.
    ///
    /// Must be called from within a tokio runtime: creating a topic spawns
    /// its delivery task.
    pub fn subscribe(&self, conn: &SharedConnection, topic: &str) -> Result<(), HubError> {
        ensure_topic_name(topic)?;
        ensure_identified(conn.as_ref())?;
        if let Some(allowed) = &self.allowed_topics {
            if !allowed.contains(topic) {
                return Err(HubError::TopicIsNotAllowed);
            }
        }
        self.middleware.run(|m| m.on_subscribe(conn.as_ref(), topic))?;

        let _topology = self.topology.lock().unwrap_or_else(|e| e.into_inner());
        let t = match self.registry.get_topic(topic) {
            Ok(t) => t,
            Err(HubError::TopicNotFound) => self.registry.add_topic(topic),
            Err(e) => return Err(e),
        };
        t.subscribe(conn.clone());
        Ok(())
    }

    /// Unsubscribe `conn` from `topic`. The topic is removed once empty.
    pub fn unsubscribe(&self, conn: &SharedConnection, topic: &str) -> Result<(), HubError> {
        ensure_topic_name(topic)?;
        ensure_identified(conn.as_ref())?;
        self.middleware
            .run(|m| m.on_unsubscribe(conn.as_ref(), topic))?;

        let _topology = self.topology.lock().unwrap_or_else(|e| e.into_inner());
        let t = self.registry.get_topic(topic)?;
        t.unsubscribe(conn.id());
        if t.is_empty() {
            self.registry.remove_topic(topic);
        }
        Ok(())
    }

    /// Queue `payload` for delivery to the current subscribers of `topic`.
    ///
    /// Returns once queued. Waits while the topic's queue is full. Write
    /// failures during delivery are logged, never returned here.
    pub async fn publish(&self, topic: &str, payload: impl Into<Bytes>) -> Result<(), HubError> {
        ensure_topic_name(topic)?;
        let payload = payload.into();
        self.middleware.run(|m| m.on_publish(topic, &payload))?;

        let t = self.registry.get_topic(topic)?;
        t.publish(payload).await
    }

    /// Write `payload` to every registered connection and wait for all
    /// writes. Returns the first write error, if any.
    pub async fn broadcast_to_all(&self, payload: impl Into<Bytes>) -> Result<(), HubError> {
        let payload = payload.into();
        self.middleware.run(|m| m.on_broadcast_to_all(&payload))?;

        let conns = self.registry.get_all_connections();
        fan_out(conns, payload).await
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }

    pub fn has_connection(&self, id: &str) -> bool {
        self.registry.get_connection(id).is_ok()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.registry.topic_names()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.registry.get_topic(topic).is_ok()
    }

    pub fn subscriber_count(&self, topic: &str) -> Result<usize, HubError> {
        Ok(self.registry.get_topic(topic)?.len())
    }

    pub fn is_subscribed(&self, conn_id: &str, topic: &str) -> bool {
        self.registry
            .get_topic(topic)
            .is_ok_and(|t| t.is_subscribed(conn_id))
    }

    /// Remove every topic and stop their delivery tasks. Connections stay
    /// registered and `broadcast_to_all` keeps working.
    pub fn shutdown(&self) {
        let _topology = self.topology.lock().unwrap_or_else(|e| e.into_inner());
        self.registry.close_all();
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("registry", &self.registry)
            .field("middleware", &self.middleware.len())
            .field("allowed_topics", &self.allowed_topics)
            .finish()
    }
}

fn ensure_topic_name(topic: &str) -> Result<(), HubError> {
    if topic.is_empty() {
        return Err(HubError::InvalidTopicName);
    }
    Ok(())
}

fn ensure_identified(conn: &dyn Connection) -> Result<(), HubError> {
    if conn.id().is_empty() {
        return Err(HubError::NilConnection);
    }
    Ok(())
}
