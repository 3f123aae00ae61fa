//! The authoritative trip record.

use common::{OfferId, TripId};
use serde::{Deserialize, Serialize};

use super::{Location, Order, Price, TripError, TripStatus};

/// A trip as described by the `trip.event.created` event and kept current by
/// later lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub offer_id: OfferId,
    pub from: Location,
    pub to: Location,
    pub price: Price,
    pub status: TripStatus,
}

impl Trip {
    /// Builds the initial record for a trip from a redeemed offer.
    pub fn from_offer(trip_id: TripId, offer_id: OfferId, order: Order) -> Self {
        Self {
            trip_id,
            offer_id,
            from: order.from,
            to: order.to,
            price: order.price,
            status: TripStatus::DriverSearch,
        }
    }

    /// Moves the trip to `next`, rejecting transitions the state machine forbids.
    pub fn transition(&mut self, next: TripStatus) -> Result<(), TripError> {
        if !self.status.can_transition_to(next) {
            return Err(TripError::InvalidTransition {
                trip_id: self.trip_id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
