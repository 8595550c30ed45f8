//! Error types surfaced by the hub.
//!
//! Validation failures are returned before any state is touched. Middleware
//! and connection errors are carried verbatim so callers can downcast them.

use thiserror::Error;
use tokio::task::JoinError;

/// Boxed error used at the capability seams (connection writes, middleware hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("topic not found")]
    TopicNotFound,
    #[error("connection not found")]
    ConnectionNotFound,
    #[error("invalid topic name")]
    InvalidTopicName,
    #[error("connection is nil")]
    NilConnection,
    #[error("topic is not allowed")]
    TopicIsNotAllowed,
    /// A middleware hook vetoed the operation.
    #[error(transparent)]
    Middleware(BoxError),
    /// A connection write failed during a delivery round or broadcast.
    #[error(transparent)]
    Write(BoxError),
    /// A write task panicked or was aborted before reporting.
    #[error("write task failed: {0}")]
    DeliveryTask(#[from] JoinError),
}
