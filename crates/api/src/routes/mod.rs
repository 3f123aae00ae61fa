//! HTTP handlers, grouped by service surface.

pub mod offers;
pub mod ops;
pub mod trips;
