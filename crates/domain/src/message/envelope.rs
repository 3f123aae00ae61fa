//! The wire envelope wrapped around every command and event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CONTENT_TYPE, MessageType, TripMessage};
use crate::error::DecodeError;

/// JSON envelope: `id, source, type, datacontenttype, time, data`.
///
/// `type` is kept as the raw string so that unregistered types survive
/// deserialization and can be reported by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub datacontenttype: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Wraps a message stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        message: &TripMessage,
    ) -> Result<Self, DecodeError> {
        Self::at(id, source, Utc::now(), message)
    }

    /// Wraps a message with an explicit emission time.
    pub fn at(
        id: impl Into<String>,
        source: impl Into<String>,
        time: DateTime<Utc>,
        message: &TripMessage,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            id: id.into(),
            source: source.into(),
            message_type: message.message_type().as_str().to_string(),
            datacontenttype: CONTENT_TYPE.to_string(),
            time,
            data: message.to_data()?,
        })
    }

    /// Parses an envelope from raw transport bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serializes the envelope for the transport.
    pub fn to_vec(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Resolves the registered message type.
    pub fn kind(&self) -> Result<MessageType, DecodeError> {
        self.message_type.parse()
    }

    /// Validates the content type and decodes `data` with the schema of `type`.
    pub fn decode(&self) -> Result<TripMessage, DecodeError> {
        if self.datacontenttype != CONTENT_TYPE {
            return Err(DecodeError::ContentType {
                found: self.datacontenttype.clone(),
            });
        }
        TripMessage::decode(self.kind()?, &self.data)
    }

    /// Builds a response that correlates with this envelope: same `id` and
    /// `time`, new `source` and payload.
    pub fn reply(&self, source: &str, message: &TripMessage) -> Result<Self, DecodeError> {
        Self::at(self.id.clone(), source, self.time, message)
    }
}
