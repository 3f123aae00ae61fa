use thiserror::Error;

/// Errors that can occur when talking to the message broker.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The broker could not be reached when opening a connection.
    #[error("Failed to connect to {address} for topic {topic}: {reason}")]
    Connect {
        address: String,
        topic: String,
        reason: String,
    },

    /// A read or write on an open connection failed.
    #[error("I/O error on topic {topic}: {reason}")]
    Io { topic: String, reason: String },

    /// The connection has been closed and can no longer be used.
    #[error("Connection to topic {0} is closed")]
    Closed(String),
}

impl TransportError {
    pub(crate) fn io(topic: &str, reason: impl ToString) -> Self {
        TransportError::Io {
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
