//! Trip entity and related types.

mod record;
mod state;
mod value_objects;

pub use record::Trip;
pub use state::TripStatus;
pub use value_objects::{DEFAULT_CURRENCY, Location, OfferRequest, Order, Price};

use common::TripId;
use thiserror::Error;

/// Errors that can occur when applying changes to a trip.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripError {
    /// The trip is not in a status that allows the requested transition.
    #[error("Invalid status transition for trip {trip_id}: {from} -> {to}")]
    InvalidTransition {
        trip_id: TripId,
        from: TripStatus,
        to: TripStatus,
    },
}
