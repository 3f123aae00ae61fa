//! Projection error types.

use domain::DecodeError;
use thiserror::Error;

/// Errors that can occur while maintaining the trip read model.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be read back.
    #[error("Corrupt document for trip {trip_id}: {reason}")]
    CorruptDocument { trip_id: String, reason: String },

    /// An inbound event could not be decoded.
    #[error("Event decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
