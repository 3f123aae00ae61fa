//! Connection traits shared by every broker backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// An open handle on one topic partition.
///
/// `receive` returns payloads in the order the broker assigned them within
/// the partition. No read position is committed anywhere: a fresh
/// connection starts from the broker's initial position again.
#[async_trait]
pub trait TopicConnection: Send + Sync {
    /// The topic this connection is bound to.
    fn topic(&self) -> &str;

    /// The partition this connection is bound to.
    fn partition(&self) -> i32;

    /// Appends a payload to the partition.
    async fn send(&self, payload: &[u8]) -> Result<()>;

    /// Waits until the next payload is available and returns it.
    ///
    /// Cancel-safe: dropping the future before it resolves does not consume
    /// a payload.
    async fn receive(&self) -> Result<Vec<u8>>;
}

/// A connection shared between the loop that reads it and the code that writes to it.
pub type SharedConnection = Arc<dyn TopicConnection>;

/// Opens connections against one broker address.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The broker address this connector dials.
    fn address(&self) -> &str;

    /// Opens a connection to `topic`/`partition`.
    ///
    /// Fails with [`crate::TransportError::Connect`] when the broker is unreachable.
    async fn connect(&self, topic: &str, partition: i32) -> Result<SharedConnection>;
}
