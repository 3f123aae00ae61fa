//! Offer issuance and redemption.

use common::OfferId;
use domain::{OfferRequest, Order};

use crate::fare;
use crate::token::OfferCodec;
use crate::Result;

/// A freshly issued offer: the priced order and the token that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedOffer {
    pub offer_id: OfferId,
    pub order: Order,
}

/// Prices routes and hands out signed offer tokens.
#[derive(Clone)]
pub struct OfferService {
    codec: OfferCodec,
}

impl OfferService {
    /// Creates a service that signs with the given codec.
    pub fn new(codec: OfferCodec) -> Self {
        Self { codec }
    }

    /// Returns the codec used to sign and verify offers.
    pub fn codec(&self) -> &OfferCodec {
        &self.codec
    }

    /// Prices the requested route and signs the resulting order.
    #[tracing::instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub fn create_offer(&self, request: OfferRequest) -> Result<IssuedOffer> {
        let price = fare::quote(request.client_id.as_str(), request.from, request.to);
        let order = Order::priced(request, price);
        let offer_id = self.codec.issue(&order)?;

        metrics::counter!("offers_issued_total").increment(1);
        tracing::info!(price = %order.price, "offer issued");

        Ok(IssuedOffer { offer_id, order })
    }

    /// Verifies an offer token and returns the order it carries.
    #[tracing::instrument(skip(self, offer_id))]
    pub fn redeem(&self, offer_id: &str) -> Result<Order> {
        match self.codec.redeem(offer_id) {
            Ok(order) => {
                metrics::counter!("offers_redeemed_total", "outcome" => "ok").increment(1);
                Ok(order)
            }
            Err(e) => {
                metrics::counter!("offers_redeemed_total", "outcome" => "rejected").increment(1);
                tracing::warn!(error = %e, "offer rejected");
                Err(e)
            }
        }
    }
}
