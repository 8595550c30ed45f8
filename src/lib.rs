//! # TopicHub
//!
//! `topichub` is an in-process publish/subscribe hub. Callers register
//! connections (anything implementing [`Connection`]), subscribe them to named
//! topics, publish payloads to a topic's subscribers, or broadcast to every
//! registered connection. A middleware chain sees every operation first and
//! may veto it.
//!
//! ## Core Modules
//!
//! - `broker`: the [`Hub`], its registry, topics and their delivery tasks.
//! - `connection`: the [`Connection`] capability and a channel-backed adapter.
//! - `middleware`: the [`Middleware`] hooks and a couple of stock variants.
//! - `config`: loading [`Settings`] from files and the environment.
//! - `utils`: the [`HubError`] type and logging setup.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use topichub::{ChannelConnection, Hub, Options, SharedConnection};
//!
//! # async fn run() -> Result<(), topichub::HubError> {
//! let hub = Hub::new(Options::default().allow_topics(["chat"]));
//! let (conn, mut peer) = ChannelConnection::new();
//! let conn: SharedConnection = Arc::new(conn);
//!
//! hub.add_connection(&conn)?;
//! hub.subscribe(&conn, "chat")?;
//! hub.publish("chat", "hello").await?;
//!
//! assert_eq!(peer.incoming.recv().await.unwrap(), "hello");
//! # Ok(())
//! # }
//! ```

pub mod broker;
pub mod config;
pub mod connection;
pub mod middleware;
pub mod utils;

pub use broker::{Hub, Options};
pub use crate::config::{Settings, load_config};
pub use connection::{ChannelConnection, ChannelPeer, Connection, SharedConnection};
pub use middleware::{Middleware, TopicDenyList, TracingMiddleware};
pub use utils::error::{BoxError, HubError};
