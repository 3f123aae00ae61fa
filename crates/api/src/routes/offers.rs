//! Offering service endpoints: issue and redeem offer tokens.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use domain::{OfferRequest, Order};
use offering::OfferService;

use crate::error::ApiError;

/// POST /offers: prices the route and answers with the raw token string.
#[tracing::instrument(skip_all, fields(client_id))]
pub async fn issue(
    State(service): State<Arc<OfferService>>,
    body: Result<Json<OfferRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    metrics::counter!("http_requests_total", "method" => "create_offer").increment(1);

    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    tracing::Span::current().record("client_id", request.client_id.as_str());

    let issued = service.create_offer(request)?;
    tracing::info!(price = %issued.order.price, "offer issued");
    Ok(issued.offer_id.as_str().to_string())
}

/// GET /offers/{offer_id}: verifies the token and returns the order it embeds.
#[tracing::instrument(skip_all)]
pub async fn redeem(
    State(service): State<Arc<OfferService>>,
    Path(offer_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    metrics::counter!("http_requests_total", "method" => "get_offer").increment(1);

    let order = service.redeem(&offer_id).inspect_err(|err| {
        tracing::info!(error = %err, "offer rejected");
    })?;
    Ok(Json(order))
}
