//! The trip document served to read queries.

use common::{ClientId, OfferId, TripId};
use domain::{Location, Price, Trip, TripStatus};
use serde::{Deserialize, Serialize};

/// A trip as stored in the read model, optionally tagged with the client
/// that booked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDocument {
    pub trip_id: TripId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ClientId>,
    pub offer_id: OfferId,
    pub from: Location,
    pub to: Location,
    pub price: Price,
    pub status: TripStatus,
}

impl TripDocument {
    /// Builds an unowned document from a trip record.
    pub fn from_trip(trip: Trip) -> Self {
        Self {
            trip_id: trip.trip_id,
            user_id: None,
            offer_id: trip.offer_id,
            from: trip.from,
            to: trip.to,
            price: trip.price,
            status: trip.status,
        }
    }

    /// Builds a document owned by `user_id`.
    pub fn owned_by(trip: Trip, user_id: ClientId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::from_trip(trip)
        }
    }

    /// Returns true if `user_id` booked this trip.
    pub fn is_owned_by(&self, user_id: &ClientId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }

    /// Overwrites the trip fields from `trip`, keeping the owner and never
    /// moving the status backwards.
    pub fn merge_trip(&mut self, trip: &Trip) {
        self.merge(Self::from_trip(trip.clone()));
    }

    /// Folds `incoming` into this document. Trip fields are overwritten, an
    /// owner is taken when `incoming` has one, and the status only moves
    /// along a legal transition.
    pub fn merge(&mut self, incoming: TripDocument) {
        if incoming.user_id.is_some() {
            self.user_id = incoming.user_id;
        }
        self.offer_id = incoming.offer_id;
        self.from = incoming.from;
        self.to = incoming.to;
        self.price = incoming.price;
        if self.status.can_transition_to(incoming.status) {
            self.status = incoming.status;
        }
    }
}

/// Outcome of a status-only update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The document moved from one status to the next.
    Applied { from: TripStatus, to: TripStatus },
    /// No document exists for the trip. Nothing was written.
    UnknownTrip,
    /// The stored status does not allow the transition. Nothing was written.
    Rejected { current: TripStatus },
}

impl StatusUpdate {
    /// Decides the outcome of moving a document in `current` status to `next`.
    pub fn evaluate(current: TripStatus, next: TripStatus) -> Self {
        if current.can_transition_to(next) {
            StatusUpdate::Applied {
                from: current,
                to: next,
            }
        } else {
            StatusUpdate::Rejected { current }
        }
    }

    /// Returns true if the document was changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, StatusUpdate::Applied { .. })
    }
}
