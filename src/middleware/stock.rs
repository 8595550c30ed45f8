//! Ready-made middleware.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::Middleware;
use crate::connection::Connection;
use crate::utils::error::BoxError;

/// Logs every hub operation at debug level. Never vetoes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn on_add_connection(&self, conn: &dyn Connection) -> Result<(), BoxError> {
        debug!(conn = conn.id(), "add connection");
        Ok(())
    }

    fn on_remove_connection(&self, conn: &dyn Connection) -> Result<(), BoxError> {
        debug!(conn = conn.id(), "remove connection");
        Ok(())
    }

    fn on_subscribe(&self, conn: &dyn Connection, topic: &str) -> Result<(), BoxError> {
        debug!(conn = conn.id(), topic, "subscribe");
        Ok(())
    }

    fn on_unsubscribe(&self, conn: &dyn Connection, topic: &str) -> Result<(), BoxError> {
        debug!(conn = conn.id(), topic, "unsubscribe");
        Ok(())
    }

    fn on_publish(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError> {
        debug!(topic, bytes = payload.len(), "publish");
        Ok(())
    }

    fn on_broadcast_to_all(&self, payload: &[u8]) -> Result<(), BoxError> {
        debug!(bytes = payload.len(), "broadcast to all");
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("topic '{0}' is denied")]
pub struct TopicDenied(pub String);

/// Rejects subscriptions and publishes on a fixed set of topic names.
#[derive(Debug, Clone, Default)]
pub struct TopicDenyList {
    denied: HashSet<String>,
}

impl TopicDenyList {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denied: topics.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, topic: &str) -> Result<(), BoxError> {
        if self.denied.contains(topic) {
            return Err(TopicDenied(topic.to_string()).into());
        }
        Ok(())
    }
}

impl Middleware for TopicDenyList {
    fn on_subscribe(&self, _conn: &dyn Connection, topic: &str) -> Result<(), BoxError> {
        self.check(topic)
    }

    fn on_publish(&self, topic: &str, _payload: &[u8]) -> Result<(), BoxError> {
        self.check(topic)
    }
}
