//! Trip saga for the ride-hailing services.
//!
//! The coordinator consumes trip commands from the inbound topic and answers
//! each with a trip event, fanned out to the driver and/or client topics:
//!
//! | Command | Event | Targets |
//! |---|---|---|
//! | `trip.command.create` | `trip.event.created` | driver, client |
//! | `trip.command.accept` | `trip.event.accepted` | client |
//! | `trip.command.start` | `trip.event.started` | client |
//! | `trip.command.end` | `trip.event.ended` | client |
//! | `trip.command.cancel` | `trip.event.canceled` | driver |
//!
//! Creating a trip redeems the offer it was booked from.

pub mod coordinator;
pub mod error;
pub mod offers;
pub mod routing;

pub use coordinator::{Outbound, TripSagaCoordinator};
pub use error::{Result, SagaError};
pub use offers::{HttpOfferResolver, LocalOfferResolver, OfferResolver};
pub use routing::FanOutTarget;
