//! Identifiers shared by every trip lifecycle service.

pub mod types;

pub use types::{ClientId, OfferId, TripId};
