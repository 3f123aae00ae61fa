//! Topic/partition message transport.
//!
//! - [`Connector`] / [`TopicConnection`]: the broker seam
//! - [`InMemoryBroker`]: in-process broker used by tests and local runs
//! - `KafkaConnector`: Kafka backend, behind the `kafka` feature
//! - [`ConsumerLoop`]: cancellable single-consumer poll loop

pub mod connection;
pub mod error;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod memory;
pub mod poll;
pub mod topics;

pub use connection::{Connector, SharedConnection, TopicConnection};
pub use error::{Result, TransportError};
#[cfg(feature = "kafka")]
pub use kafka::KafkaConnector;
pub use memory::{InMemoryBroker, MEMORY_ADDRESS};
pub use poll::{ConsumerLoop, DEFAULT_POLL_INTERVAL, LoopStats, MessageHandler};
