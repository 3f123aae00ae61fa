use thiserror::Error;

/// Errors that can occur when issuing or redeeming an offer token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's signature does not match its content.
    #[error("Offer token signature is invalid")]
    InvalidSignature,

    /// The token's validity window has passed.
    #[error("Offer token has expired")]
    Expired,

    /// The token is not a well-formed offer token or its order cannot be read.
    #[error("Offer token is malformed: {0}")]
    Malformed(String),

    /// Signing a new token failed.
    #[error("Failed to sign offer token: {0}")]
    Signing(String),

    /// The configured key material could not be loaded.
    #[error("Invalid offer signing key: {0}")]
    Key(String),
}

/// Result type for offer operations.
pub type Result<T> = std::result::Result<T, TokenError>;
