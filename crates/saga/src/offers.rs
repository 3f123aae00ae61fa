//! Offer redemption seam used when a trip is created.

use std::time::Duration;

use async_trait::async_trait;
use common::OfferId;
use domain::Order;
use offering::OfferService;

use crate::error::{Result, SagaError};

const OFFERING: &str = "offering";

/// Turns an offer id back into the priced order it was issued for.
#[async_trait]
pub trait OfferResolver: Send + Sync {
    /// Redeems `offer_id`, failing when the offer is invalid or expired.
    async fn redeem(&self, offer_id: &OfferId) -> Result<Order>;
}

/// Redeems offers through the offering service's `GET /offers/{offer_id}`.
#[derive(Debug, Clone)]
pub struct HttpOfferResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOfferResolver {
    /// Creates a resolver against `base_url`, e.g. `http://offering:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a resolver with a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(upstream)?;
        Ok(Self::with_client(client, base_url))
    }

    fn offer_url(&self, offer_id: &OfferId) -> String {
        format!("{}/offers/{}", self.base_url, offer_id)
    }
}

fn upstream(err: reqwest::Error) -> SagaError {
    SagaError::Upstream {
        service: OFFERING,
        reason: err.to_string(),
    }
}

#[async_trait]
impl OfferResolver for HttpOfferResolver {
    #[tracing::instrument(skip(self, offer_id))]
    async fn redeem(&self, offer_id: &OfferId) -> Result<Order> {
        let response = self
            .client
            .get(self.offer_url(offer_id))
            .send()
            .await
            .map_err(upstream)?;

        let status = response.status();
        if status.is_client_error() {
            return Err(SagaError::OfferRejected(status.as_u16()));
        }
        if !status.is_success() {
            return Err(SagaError::Upstream {
                service: OFFERING,
                reason: format!("unexpected status {status}"),
            });
        }

        response.json::<Order>().await.map_err(upstream)
    }
}

/// Redeems offers in-process with the offering service's own codec.
#[derive(Clone)]
pub struct LocalOfferResolver {
    service: OfferService,
}

impl LocalOfferResolver {
    pub fn new(service: OfferService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OfferResolver for LocalOfferResolver {
    async fn redeem(&self, offer_id: &OfferId) -> Result<Order> {
        Ok(self.service.redeem(offer_id.as_str())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ClientId;
    use domain::{Location, OfferRequest};
    use offering::{OfferCodec, TokenError};

    #[test]
    fn test_offer_url_trims_trailing_slash() {
        let resolver = HttpOfferResolver::new("http://offering:8080/");
        assert_eq!(
            resolver.offer_url(&OfferId::new("abc.def.ghi")),
            "http://offering:8080/offers/abc.def.ghi"
        );
    }

    #[tokio::test]
    async fn test_local_resolver_redeems_and_rejects() {
        let service = OfferService::new(OfferCodec::hs256(b"local"));
        let offer = service
            .create_offer(OfferRequest {
                from: Location::new(1.0, 1.0),
                to: Location::new(2.0, 2.0),
                client_id: ClientId::new("c"),
            })
            .unwrap();
        let resolver = LocalOfferResolver::new(service);

        assert_eq!(resolver.redeem(&offer.offer_id).await.unwrap(), offer.order);
        assert!(matches!(
            resolver.redeem(&OfferId::new("x.y.z")).await,
            Err(SagaError::Token(TokenError::InvalidSignature))
        ));
    }
}
