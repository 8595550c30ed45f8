//! Middleware
//!
//! Hooks that observe or veto hub operations before they take effect. Each
//! hook mirrors one hub operation and receives the same arguments. Hooks run
//! synchronously in registration order; the first error aborts the rest of the
//! chain and the operation itself, before any registry or topic state changes.
//!
//! Side effects performed by a hook that is later vetoed by another hook are
//! the hook's own business.

pub mod stock;

use std::sync::{Arc, RwLock};

use crate::connection::Connection;
use crate::utils::error::{BoxError, HubError};

pub use stock::{TopicDenyList, TracingMiddleware};

/// An interceptor for hub operations. Every hook defaults to allowing the
/// operation.
pub trait Middleware: Send + Sync {
    fn on_add_connection(&self, _conn: &dyn Connection) -> Result<(), BoxError> {
        Ok(())
    }

    fn on_remove_connection(&self, _conn: &dyn Connection) -> Result<(), BoxError> {
        Ok(())
    }

    fn on_subscribe(&self, _conn: &dyn Connection, _topic: &str) -> Result<(), BoxError> {
        Ok(())
    }

    fn on_unsubscribe(&self, _conn: &dyn Connection, _topic: &str) -> Result<(), BoxError> {
        Ok(())
    }

    fn on_publish(&self, _topic: &str, _payload: &[u8]) -> Result<(), BoxError> {
        Ok(())
    }

    fn on_broadcast_to_all(&self, _payload: &[u8]) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Ordered list of middleware, first registered runs first.
#[derive(Default)]
pub struct MiddlewareChain {
    items: RwLock<Vec<Arc<dyn Middleware>>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, middleware: Arc<dyn Middleware>) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(middleware);
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `hook` against every middleware, stopping at the first failure.
    ///
    /// The list is snapshotted first so a hook may register more middleware
    /// without deadlocking; additions apply from the next operation on.
    pub fn run<F>(&self, mut hook: F) -> Result<(), HubError>
    where
        F: FnMut(&dyn Middleware) -> Result<(), BoxError>,
    {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner()).clone();
        for middleware in &items {
            hook(middleware.as_ref()).map_err(HubError::Middleware)?;
        }
        Ok(())
    }
}
