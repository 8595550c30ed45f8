//! In-process connection backed by tokio channels.
//!
//! Useful for bridging the hub into tasks that already own a socket writer,
//! and for tests.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use super::Connection;
use crate::utils::error::BoxError;

#[derive(Debug, Error)]
#[error("connection {0} is closed")]
pub struct ConnectionClosed(pub String);

#[derive(Debug)]
pub struct ChannelConnection {
    id: String,
    outbound: UnboundedSender<Bytes>,
    inbound: Mutex<UnboundedReceiver<Bytes>>,
}

/// The far end of a [`ChannelConnection`].
#[derive(Debug)]
pub struct ChannelPeer {
    /// Payloads the hub wrote to the connection.
    pub incoming: UnboundedReceiver<Bytes>,
    /// Payloads later returned by `Connection::read`.
    pub outgoing: UnboundedSender<Bytes>,
}

impl ChannelConnection {
    /// Create a connection with a random UUID identifier.
    pub fn new() -> (Self, ChannelPeer) {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> (Self, ChannelPeer) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let conn = Self {
            id: id.into(),
            outbound: out_tx,
            inbound: Mutex::new(in_rx),
        };
        let peer = ChannelPeer {
            incoming: out_rx,
            outgoing: in_tx,
        };
        (conn, peer)
    }
}

#[async_trait]
impl Connection for ChannelConnection {
    fn id(&self) -> &str {
        &self.id
    }

    async fn write(&self, payload: Bytes) -> Result<(), BoxError> {
        self.outbound
            .send(payload)
            .map_err(|_| ConnectionClosed(self.id.clone()))?;
        Ok(())
    }

    async fn read(&self) -> Result<Bytes, BoxError> {
        let mut inbound = self.inbound.lock().await;
        match inbound.recv().await {
            Some(payload) => Ok(payload),
            None => Err(ConnectionClosed(self.id.clone()).into()),
        }
    }
}
