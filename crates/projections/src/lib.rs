//! Trip read model.
//!
//! This crate provides the query side of the trip services:
//! - [`TripDocument`] and the [`TripDocumentStore`] trait
//! - [`InMemoryTripStore`] and [`PostgresTripStore`] implementations
//! - [`ProjectionUpdater`], which applies trip events to a store

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod updater;

pub use document::{StatusUpdate, TripDocument};
pub use error::{ProjectionError, Result};
pub use memory::InMemoryTripStore;
pub use postgres::PostgresTripStore;
pub use store::TripDocumentStore;
pub use updater::{ProjectionUpdater, UpdateOutcome};
