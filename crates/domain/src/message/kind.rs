//! Registry of message type names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::trip::TripStatus;

/// Every `type` value the trip saga understands, commands and events.
///
/// Names follow `<entity>.<command|event>.<verb>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MessageType {
    CreateTrip,
    AcceptTrip,
    StartTrip,
    EndTrip,
    CancelTrip,
    TripCreated,
    TripAccepted,
    TripStarted,
    TripEnded,
    TripCanceled,
}

impl MessageType {
    /// All registered message types.
    pub const ALL: [MessageType; 10] = [
        MessageType::CreateTrip,
        MessageType::AcceptTrip,
        MessageType::StartTrip,
        MessageType::EndTrip,
        MessageType::CancelTrip,
        MessageType::TripCreated,
        MessageType::TripAccepted,
        MessageType::TripStarted,
        MessageType::TripEnded,
        MessageType::TripCanceled,
    ];

    /// Returns the wire name of this message type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::CreateTrip => "trip.command.create",
            MessageType::AcceptTrip => "trip.command.accept",
            MessageType::StartTrip => "trip.command.start",
            MessageType::EndTrip => "trip.command.end",
            MessageType::CancelTrip => "trip.command.cancel",
            MessageType::TripCreated => "trip.event.created",
            MessageType::TripAccepted => "trip.event.accepted",
            MessageType::TripStarted => "trip.event.started",
            MessageType::TripEnded => "trip.event.ended",
            MessageType::TripCanceled => "trip.event.canceled",
        }
    }

    /// Returns true for `<entity>.command.<verb>` types.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            MessageType::CreateTrip
                | MessageType::AcceptTrip
                | MessageType::StartTrip
                | MessageType::EndTrip
                | MessageType::CancelTrip
        )
    }

    /// Returns true for `<entity>.event.<verb>` types.
    pub fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// The event a command produces, if this is a command.
    pub fn resulting_event(&self) -> Option<MessageType> {
        match self {
            MessageType::CreateTrip => Some(MessageType::TripCreated),
            MessageType::AcceptTrip => Some(MessageType::TripAccepted),
            MessageType::StartTrip => Some(MessageType::TripStarted),
            MessageType::EndTrip => Some(MessageType::TripEnded),
            MessageType::CancelTrip => Some(MessageType::TripCanceled),
            _ => None,
        }
    }

    /// The trip status an event reports, if this is an event.
    pub fn reported_status(&self) -> Option<TripStatus> {
        match self {
            MessageType::TripCreated => Some(TripStatus::DriverSearch),
            MessageType::TripAccepted => Some(TripStatus::Accepted),
            MessageType::TripStarted => Some(TripStatus::Started),
            MessageType::TripEnded => Some(TripStatus::Ended),
            MessageType::TripCanceled => Some(TripStatus::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownType(s.to_string()))
    }
}

impl TryFrom<String> for MessageType {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageType> for String {
    fn from(kind: MessageType) -> Self {
        kind.as_str().to_string()
    }
}
