//! Saga error types.

use std::time::Duration;

use domain::DecodeError;
use offering::TokenError;
use thiserror::Error;
use transport::TransportError;

/// Errors that abort processing of a single inbound command.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The inbound payload was not a valid command envelope.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The offer token could not be redeemed.
    #[error("Offer token error: {0}")]
    Token(#[from] TokenError),

    /// The offering service refused to redeem the offer.
    #[error("Offer rejected by offering service with status {0}")]
    OfferRejected(u16),

    /// A downstream service call failed.
    #[error("{service} call failed: {reason}")]
    Upstream {
        service: &'static str,
        reason: String,
    },

    /// Offer redemption did not finish in time.
    #[error("Offer redemption timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// A fan-out send failed. Sends before it have already been delivered.
    #[error("Fan-out to {topic} failed after {delivered} delivered: {source}")]
    FanOut {
        topic: String,
        delivered: usize,
        #[source]
        source: TransportError,
    },
}

impl SagaError {
    /// Short label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            SagaError::Decode(_) => "decode",
            SagaError::Token(_) | SagaError::OfferRejected(_) => "token",
            SagaError::Upstream { .. } | SagaError::UpstreamTimeout(_) => "upstream",
            SagaError::FanOut { .. } => "transport",
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
