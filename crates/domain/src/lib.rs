//! Domain layer for the trip saga.
//!
//! This crate provides:
//! - Trip status state machine and the authoritative trip record
//! - Route and fare value objects, and the priced order an offer embeds
//! - Message envelope with a typed payload registry keyed by `type`

pub mod error;
pub mod message;
pub mod trip;

pub use error::{DecodeError, DomainError};
pub use message::{
    CONTENT_TYPE, CancelTripData, CreateTripData, Envelope, MessageType, SOURCE_CLIENT,
    SOURCE_DRIVER, SOURCE_TRIP, TripCanceledData, TripCreatedData, TripMessage, TripRef,
};
pub use trip::{
    DEFAULT_CURRENCY, Location, OfferRequest, Order, Price, Trip, TripError, TripStatus,
};
