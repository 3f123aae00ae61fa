//! Typed `data` payloads, one variant per registered message type.

use common::{OfferId, TripId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageType;
use crate::error::DecodeError;
use crate::trip::{Location, Price, Trip, TripStatus};

/// Payload of `trip.command.create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTripData {
    pub offer_id: OfferId,
}

/// Payload carrying only the trip identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRef {
    pub trip_id: TripId,
}

/// Payload of `trip.command.cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTripData {
    pub trip_id: TripId,
    pub reason: String,
}

/// Payload of `trip.event.created`: the full initial trip record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCreatedData {
    pub trip_id: TripId,
    pub offer_id: OfferId,
    pub price: Price,
    pub status: TripStatus,
    pub from: Location,
    pub to: Location,
}

impl From<Trip> for TripCreatedData {
    fn from(trip: Trip) -> Self {
        Self {
            trip_id: trip.trip_id,
            offer_id: trip.offer_id,
            price: trip.price,
            status: trip.status,
            from: trip.from,
            to: trip.to,
        }
    }
}

impl From<TripCreatedData> for Trip {
    fn from(data: TripCreatedData) -> Self {
        Trip {
            trip_id: data.trip_id,
            offer_id: data.offer_id,
            from: data.from,
            to: data.to,
            price: data.price,
            status: data.status,
        }
    }
}

/// Payload of `trip.event.canceled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripCanceledData {
    pub trip_id: TripId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A decoded message: the `type` tag together with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TripMessage {
    Create(CreateTripData),
    Accept(TripRef),
    Start(TripRef),
    End(TripRef),
    Cancel(CancelTripData),
    Created(TripCreatedData),
    Accepted(TripRef),
    Started(TripRef),
    Ended(TripRef),
    Canceled(TripCanceledData),
}

impl TripMessage {
    /// Returns the registered type of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            TripMessage::Create(_) => MessageType::CreateTrip,
            TripMessage::Accept(_) => MessageType::AcceptTrip,
            TripMessage::Start(_) => MessageType::StartTrip,
            TripMessage::End(_) => MessageType::EndTrip,
            TripMessage::Cancel(_) => MessageType::CancelTrip,
            TripMessage::Created(_) => MessageType::TripCreated,
            TripMessage::Accepted(_) => MessageType::TripAccepted,
            TripMessage::Started(_) => MessageType::TripStarted,
            TripMessage::Ended(_) => MessageType::TripEnded,
            TripMessage::Canceled(_) => MessageType::TripCanceled,
        }
    }

    /// Interprets `data` with the schema registered for `kind`.
    pub fn decode(kind: MessageType, data: &Value) -> Result<Self, DecodeError> {
        fn parse<T: for<'de> Deserialize<'de>>(data: &Value) -> Result<T, DecodeError> {
            Ok(T::deserialize(data)?)
        }

        Ok(match kind {
            MessageType::CreateTrip => TripMessage::Create(parse(data)?),
            MessageType::AcceptTrip => TripMessage::Accept(parse(data)?),
            MessageType::StartTrip => TripMessage::Start(parse(data)?),
            MessageType::EndTrip => TripMessage::End(parse(data)?),
            MessageType::CancelTrip => TripMessage::Cancel(parse(data)?),
            MessageType::TripCreated => TripMessage::Created(parse(data)?),
            MessageType::TripAccepted => TripMessage::Accepted(parse(data)?),
            MessageType::TripStarted => TripMessage::Started(parse(data)?),
            MessageType::TripEnded => TripMessage::Ended(parse(data)?),
            MessageType::TripCanceled => TripMessage::Canceled(parse(data)?),
        })
    }

    /// Serializes the payload into the envelope's `data` value.
    pub fn to_data(&self) -> Result<Value, DecodeError> {
        let value = match self {
            TripMessage::Create(data) => serde_json::to_value(data)?,
            TripMessage::Accept(data)
            | TripMessage::Start(data)
            | TripMessage::End(data)
            | TripMessage::Accepted(data)
            | TripMessage::Started(data)
            | TripMessage::Ended(data) => serde_json::to_value(data)?,
            TripMessage::Cancel(data) => serde_json::to_value(data)?,
            TripMessage::Created(data) => serde_json::to_value(data)?,
            TripMessage::Canceled(data) => serde_json::to_value(data)?,
        };
        Ok(value)
    }

    /// The trip this message refers to. `create` commands carry none; the
    /// envelope id becomes the trip id.
    pub fn trip_id(&self) -> Option<&TripId> {
        match self {
            TripMessage::Create(_) => None,
            TripMessage::Accept(data)
            | TripMessage::Start(data)
            | TripMessage::End(data)
            | TripMessage::Accepted(data)
            | TripMessage::Started(data)
            | TripMessage::Ended(data) => Some(&data.trip_id),
            TripMessage::Cancel(data) => Some(&data.trip_id),
            TripMessage::Created(data) => Some(&data.trip_id),
            TripMessage::Canceled(data) => Some(&data.trip_id),
        }
    }
}
