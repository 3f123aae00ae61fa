//! Message contracts exchanged between the trip services.

mod envelope;
mod kind;
mod payload;

pub use envelope::Envelope;
pub use kind::MessageType;
pub use payload::{
    CancelTripData, CreateTripData, TripCanceledData, TripCreatedData, TripMessage, TripRef,
};

/// The only supported `datacontenttype`.
pub const CONTENT_TYPE: &str = "application/json";

/// `source` stamped by the client service.
pub const SOURCE_CLIENT: &str = "/client";
/// `source` stamped by the trip saga coordinator.
pub const SOURCE_TRIP: &str = "/trip";
/// `source` stamped by the driver service.
pub const SOURCE_DRIVER: &str = "/driver";
