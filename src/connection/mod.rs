//! The `connection` module defines the transport capability the hub writes to.
//!
//! The hub never constructs connections. Callers wrap their sockets, WebSocket
//! sinks or in-process channels in something implementing [`Connection`] and
//! hand the hub a [`SharedConnection`].

pub mod channel;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::utils::error::BoxError;

pub use channel::{ChannelConnection, ChannelPeer, ConnectionClosed};

/// A bidirectional transport endpoint.
///
/// `id` must stay stable and unique for as long as the connection is
/// registered. An empty id marks a connection without identity, which every
/// hub operation rejects with `HubError::NilConnection`.
///
/// Writes should be bounded by the implementation; a write that never returns
/// stalls the delivery round it belongs to.
#[async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> &str;

    async fn write(&self, payload: Bytes) -> Result<(), BoxError>;

    async fn read(&self) -> Result<Bytes, BoxError>;
}

pub type SharedConnection = Arc<dyn Connection>;
