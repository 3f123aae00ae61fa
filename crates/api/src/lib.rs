//! HTTP surfaces and process bootstrap for the trip lifecycle services.
//!
//! Three services are built from this crate, each a binary under `src/bin`:
//! - `trip-service`: the trip saga loop, plus health and metrics
//! - `offering-service`: issues and redeems offer tokens
//! - `client-service`: books and cancels trips, serves the trip projection
//!
//! Every surface exposes `GET /health` and `GET /metrics`.

pub mod config;
pub mod error;
pub mod routes;
pub mod runtime;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use offering::OfferService;
use projections::TripDocumentStore;
use saga::OfferResolver;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::trips::ClientState;

/// Router for the offering service.
pub fn create_offering_app(service: OfferService, metrics_handle: PrometheusHandle) -> Router {
    let offers = Router::new()
        .route("/offers", post(routes::offers::issue))
        .route("/offers/{offer_id}", get(routes::offers::redeem))
        .with_state(Arc::new(service));

    with_layers(offers.merge(routes::ops::router(metrics_handle)))
}

/// Router for the client service.
pub fn create_client_app<S, R>(
    state: Arc<ClientState<S, R>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: TripDocumentStore + 'static,
    R: OfferResolver + 'static,
{
    let trips = Router::new()
        .route(
            "/trips",
            get(routes::trips::list::<S, R>).post(routes::trips::create::<S, R>),
        )
        .route("/trips/{trip_id}", get(routes::trips::get::<S, R>))
        .route(
            "/trips/{trip_id}/cancel",
            post(routes::trips::cancel::<S, R>),
        )
        .with_state(state);

    with_layers(trips.merge(routes::ops::router(metrics_handle)))
}

/// Router for the trip service, which has no business endpoints of its own.
pub fn create_trip_app(metrics_handle: PrometheusHandle) -> Router {
    with_layers(routes::ops::router(metrics_handle))
}

fn with_layers(router: Router) -> Router {
    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
