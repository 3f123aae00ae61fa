//! Default topic names.

/// Commands from clients and drivers to the trip saga.
pub const INBOUND: &str = "driver-client-trip-topic";
/// Events for the client service.
pub const TO_CLIENT: &str = "trip-client-topic";
/// Events for the driver service.
pub const TO_DRIVER: &str = "trip-driver-topic";
/// Every topic uses a single partition.
pub const DEFAULT_PARTITION: i32 = 0;
