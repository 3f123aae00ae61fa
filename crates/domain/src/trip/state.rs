//! Trip status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The status of a trip in its lifecycle.
///
/// State transitions:
/// ```text
/// DriverSearch ──► Accepted ──► Started ──► Ended
///      │              │            │
///      └──────────────┴────────────┴──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    /// Trip was created and is waiting for a driver.
    #[default]
    DriverSearch,

    /// A driver accepted the trip.
    Accepted,

    /// The ride is in progress.
    Started,

    /// The ride finished (terminal state).
    Ended,

    /// The trip was canceled (terminal state).
    Canceled,
}

impl TripStatus {
    /// Returns true if a driver can accept the trip in this status.
    pub fn can_accept(&self) -> bool {
        matches!(self, TripStatus::DriverSearch)
    }

    /// Returns true if the ride can start in this status.
    pub fn can_start(&self) -> bool {
        matches!(self, TripStatus::Accepted)
    }

    /// Returns true if the ride can end in this status.
    pub fn can_end(&self) -> bool {
        matches!(self, TripStatus::Started)
    }

    /// Returns true if the trip can be canceled in this status.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Ended | TripStatus::Canceled)
    }

    /// Returns true if moving from this status to `next` is a legal transition.
    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        match next {
            TripStatus::DriverSearch => false,
            TripStatus::Accepted => self.can_accept(),
            TripStatus::Started => self.can_start(),
            TripStatus::Ended => self.can_end(),
            TripStatus::Canceled => self.can_cancel(),
        }
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::DriverSearch => "DRIVER_SEARCH",
            TripStatus::Accepted => "ACCEPTED",
            TripStatus::Started => "STARTED",
            TripStatus::Ended => "ENDED",
            TripStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRIVER_SEARCH" => Ok(TripStatus::DriverSearch),
            "ACCEPTED" => Ok(TripStatus::Accepted),
            "STARTED" => Ok(TripStatus::Started),
            "ENDED" => Ok(TripStatus::Ended),
            "CANCELED" => Ok(TripStatus::Canceled),
            other => Err(format!("unknown trip status: {other}")),
        }
    }
}
