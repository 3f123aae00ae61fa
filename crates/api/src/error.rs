//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DecodeError;
use offering::TokenError;
use projections::ProjectionError;
use saga::SagaError;
use thiserror::Error;
use transport::TransportError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The trip is in a state that forbids the request.
    Conflict(String),
    /// An offer token could not be issued or redeemed.
    Offer(TokenError),
    /// Offer redemption through the offering service failed.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Offer(err) => offer_error_to_response(err),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn offer_error_to_response(err: TokenError) -> (StatusCode, String) {
    match &err {
        TokenError::Signing(_) | TokenError::Key(_) => {
            tracing::error!(error = %err, "offer signing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        _ => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

fn saga_error_to_response(err: SagaError) -> (StatusCode, String) {
    match &err {
        SagaError::Token(_) | SagaError::OfferRejected(_) | SagaError::Decode(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        SagaError::Upstream { .. } | SagaError::UpstreamTimeout(_) => {
            tracing::warn!(error = %err, "offering service unavailable");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        SagaError::FanOut { .. } => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Offer(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Failures that stop a service binary before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Telemetry setup failed: {0}")]
    Telemetry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Broker error: {0}")]
    Transport(#[from] TransportError),

    #[error("Document store error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Offer key error: {0}")]
    Offer(#[from] TokenError),

    #[error("Offer resolver error: {0}")]
    Saga(#[from] SagaError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
