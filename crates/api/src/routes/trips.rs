//! Client service endpoints: book, list, inspect and cancel trips.
//!
//! Every request names its caller in the `user_id` header. Trips are booked
//! by emitting commands for the trip saga; reads are served from the local
//! trip projection.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use common::{ClientId, OfferId, TripId};
use domain::{
    CancelTripData, CreateTripData, Envelope, Location, Price, SOURCE_CLIENT, Trip, TripMessage,
    TripStatus,
};
use projections::{StatusUpdate, TripDocument, TripDocumentStore};
use saga::OfferResolver;
use serde::{Deserialize, Serialize};
use transport::SharedConnection;

use crate::error::ApiError;

/// Header carrying the caller's client id.
pub const USER_ID_HEADER: &str = "user_id";

/// Shared state of the client service.
pub struct ClientState<S, R> {
    /// Trip projection, also written by the projection updater loop.
    pub store: S,
    pub offers: R,
    /// Connection to the saga's inbound command topic.
    pub commands: SharedConnection,
}

/// The caller's identity, taken from the `user_id` header.
#[derive(Debug, Clone)]
pub struct UserId(pub ClientId);

impl<St: Send + Sync> FromRequestParts<St> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| UserId(ClientId::new(value)))
            .ok_or_else(|| ApiError::BadRequest("Missing user_id in header".to_string()))
    }
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateTripRequest {
    pub offer_id: String,
}

#[derive(Deserialize)]
pub struct CancelParams {
    pub reason: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize, Deserialize)]
pub struct TripCreatedResponse {
    pub trip_id: TripId,
}

/// A trip as shown to the client that booked it.
#[derive(Debug, Serialize, Deserialize)]
pub struct TripView {
    pub trip_id: TripId,
    pub offer_id: OfferId,
    pub from: Location,
    pub to: Location,
    pub price: Price,
    pub status: TripStatus,
}

impl From<TripDocument> for TripView {
    fn from(document: TripDocument) -> Self {
        Self {
            trip_id: document.trip_id,
            offer_id: document.offer_id,
            from: document.from,
            to: document.to,
            price: document.price,
            status: document.status,
        }
    }
}

// -- Handlers --

/// POST /trips: books a trip from an offer the caller holds.
///
/// The offer is redeemed first and must belong to the caller. The create
/// command goes to the saga, and the caller's document is written right away
/// with status `DRIVER_SEARCH` so it shows up in reads before the saga answers.
#[tracing::instrument(skip_all, fields(user_id = %user.as_str()))]
pub async fn create<S, R>(
    State(state): State<Arc<ClientState<S, R>>>,
    UserId(user): UserId,
    body: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TripCreatedResponse>), ApiError>
where
    S: TripDocumentStore + 'static,
    R: OfferResolver + 'static,
{
    metrics::counter!("http_requests_total", "method" => "create_trip").increment(1);

    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let offer_id = OfferId::new(request.offer_id);

    let order = state.offers.redeem(&offer_id).await?;
    if order.client_id != user {
        return Err(ApiError::BadRequest("Wrong user_id".to_string()));
    }

    let trip_id = TripId::generate();
    let command = TripMessage::Create(CreateTripData {
        offer_id: offer_id.clone(),
    });
    let envelope = Envelope::new(trip_id.as_str(), SOURCE_CLIENT, &command)?;
    state.commands.send(&envelope.to_vec()?).await?;

    let trip = Trip::from_offer(trip_id.clone(), offer_id, order);
    state.store.insert(TripDocument::owned_by(trip, user)).await?;

    tracing::info!(%trip_id, "trip requested");
    Ok((StatusCode::CREATED, Json(TripCreatedResponse { trip_id })))
}

/// GET /trips: lists the caller's trips.
#[tracing::instrument(skip_all, fields(user_id = %user.as_str()))]
pub async fn list<S, R>(
    State(state): State<Arc<ClientState<S, R>>>,
    UserId(user): UserId,
) -> Result<Json<Vec<TripView>>, ApiError>
where
    S: TripDocumentStore + 'static,
    R: OfferResolver + 'static,
{
    metrics::counter!("http_requests_total", "method" => "list_trips").increment(1);

    let trips = state.store.list_for_user(&user).await?;
    Ok(Json(trips.into_iter().map(TripView::from).collect()))
}

/// GET /trips/{trip_id}
#[tracing::instrument(skip_all, fields(user_id = %user.as_str(), %trip_id))]
pub async fn get<S, R>(
    State(state): State<Arc<ClientState<S, R>>>,
    UserId(user): UserId,
    Path(trip_id): Path<String>,
) -> Result<Json<TripView>, ApiError>
where
    S: TripDocumentStore + 'static,
    R: OfferResolver + 'static,
{
    metrics::counter!("http_requests_total", "method" => "get_trip").increment(1);

    let document = owned_document(&state.store, &TripId::new(trip_id), &user).await?;
    Ok(Json(TripView::from(document)))
}

/// POST /trips/{trip_id}/cancel?reason=...
#[tracing::instrument(skip_all, fields(user_id = %user.as_str(), %trip_id))]
pub async fn cancel<S, R>(
    State(state): State<Arc<ClientState<S, R>>>,
    UserId(user): UserId,
    Path(trip_id): Path<String>,
    Query(params): Query<CancelParams>,
) -> Result<Json<TripView>, ApiError>
where
    S: TripDocumentStore + 'static,
    R: OfferResolver + 'static,
{
    metrics::counter!("http_requests_total", "method" => "cancel_trip").increment(1);

    let reason = params
        .reason
        .filter(|reason| !reason.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing reason".to_string()))?;
    let trip_id = TripId::new(trip_id);

    let mut document = owned_document(&state.store, &trip_id, &user).await?;
    if !document.status.can_cancel() {
        return Err(ApiError::Conflict(format!(
            "Trip {trip_id} is {} and can no longer be canceled",
            document.status
        )));
    }

    let command = TripMessage::Cancel(CancelTripData {
        trip_id: trip_id.clone(),
        reason: reason.clone(),
    });
    let envelope = Envelope::new(uuid::Uuid::new_v4().to_string(), SOURCE_CLIENT, &command)?;
    state.commands.send(&envelope.to_vec()?).await?;

    match state
        .store
        .update_status(&trip_id, TripStatus::Canceled)
        .await?
    {
        StatusUpdate::Applied { .. } => {
            document.status = TripStatus::Canceled;
            tracing::info!(%reason, "trip canceled");
            Ok(Json(TripView::from(document)))
        }
        StatusUpdate::Rejected { current } => Err(ApiError::Conflict(format!(
            "Trip {trip_id} is {current} and can no longer be canceled"
        ))),
        StatusUpdate::UnknownTrip => Err(not_found(&trip_id)),
    }
}

async fn owned_document<S: TripDocumentStore>(
    store: &S,
    trip_id: &TripId,
    user: &ClientId,
) -> Result<TripDocument, ApiError> {
    store
        .get(trip_id)
        .await?
        .filter(|document| document.is_owned_by(user))
        .ok_or_else(|| not_found(trip_id))
}

fn not_found(trip_id: &TripId) -> ApiError {
    ApiError::NotFound(format!("Trip {trip_id} not found"))
}
