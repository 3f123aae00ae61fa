//! Domain error types.

use thiserror::Error;

use crate::message::{CONTENT_TYPE, MessageType};
use crate::trip::TripError;

/// Errors raised while decoding an inbound envelope or its payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The envelope or its `data` field is not valid JSON for the expected schema.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// `datacontenttype` is not the supported marker.
    #[error("Unsupported content type {found:?}, expected {CONTENT_TYPE:?}")]
    ContentType { found: String },

    /// `type` names no registered message.
    #[error("Unknown message type: {0}")]
    UnknownType(String),

    /// The message is valid but not of the kind this consumer handles.
    #[error("Unexpected message type {actual}, expected {expected}")]
    UnexpectedKind {
        expected: &'static str,
        actual: MessageType,
    },
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A message could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A trip rejected a change.
    #[error("Trip error: {0}")]
    Trip(#[from] TripError),
}
