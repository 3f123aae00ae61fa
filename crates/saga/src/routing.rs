//! Which topics hear about each trip event.

use domain::MessageType;

/// A downstream listener of trip events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutTarget {
    Driver,
    Client,
}

impl FanOutTarget {
    /// Returns the target name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FanOutTarget::Driver => "driver",
            FanOutTarget::Client => "client",
        }
    }
}

/// Returns the fan-out targets for an outbound event, in send order.
///
/// Commands are never fanned out and get an empty list.
pub fn targets(event: MessageType) -> &'static [FanOutTarget] {
    match event {
        MessageType::TripCreated => &[FanOutTarget::Driver, FanOutTarget::Client],
        MessageType::TripAccepted | MessageType::TripStarted | MessageType::TripEnded => {
            &[FanOutTarget::Client]
        }
        MessageType::TripCanceled => &[FanOutTarget::Driver],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_goes_to_driver_then_client() {
        assert_eq!(
            targets(MessageType::TripCreated),
            &[FanOutTarget::Driver, FanOutTarget::Client]
        );
    }

    #[test]
    fn test_progress_events_go_to_client() {
        for event in [
            MessageType::TripAccepted,
            MessageType::TripStarted,
            MessageType::TripEnded,
        ] {
            assert_eq!(targets(event), &[FanOutTarget::Client]);
        }
    }

    #[test]
    fn test_canceled_goes_to_driver() {
        assert_eq!(targets(MessageType::TripCanceled), &[FanOutTarget::Driver]);
    }

    #[test]
    fn test_every_command_result_has_targets() {
        for kind in MessageType::ALL.into_iter().filter(MessageType::is_command) {
            assert!(targets(kind).is_empty());
            let event = kind.resulting_event().unwrap();
            assert!(!targets(event).is_empty());
        }
    }
}
