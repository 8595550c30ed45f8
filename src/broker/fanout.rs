//! Concurrent fan-out of one payload to many connections.
//!
//! One task per connection, all joined before returning. Only the first error
//! observed is reported; the rest of that batch's errors are dropped and
//! nothing is retried.

use bytes::Bytes;
use tokio::task::JoinSet;

use crate::connection::SharedConnection;
use crate::utils::error::HubError;

pub(crate) async fn fan_out(conns: Vec<SharedConnection>, payload: Bytes) -> Result<(), HubError> {
    let mut writes = JoinSet::new();
    for conn in conns {
        let payload = payload.clone();
        writes.spawn(async move { conn.write(payload).await });
    }

    let mut first_err = None;
    while let Some(joined) = writes.join_next().await {
        let err = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => HubError::Write(e),
            Err(e) => HubError::DeliveryTask(e),
        };
        first_err.get_or_insert(err);
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
