//! Offer issuance for the trip services.
//!
//! Offers are never stored. A priced order is signed into an expiring token
//! that later steps of the trip saga redeem.

pub mod error;
pub mod fare;
pub mod service;
pub mod token;

pub use error::{Result, TokenError};
pub use fare::{client_weight, quote};
pub use service::{IssuedOffer, OfferService};
pub use token::{DEFAULT_VALIDITY_SECS, OfferCodec};
