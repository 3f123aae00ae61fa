//! Signed, expiring offer tokens.
//!
//! A token is a JWT whose claims are `{order, exp}`, where `order` is the
//! priced order serialized to a JSON string and `exp` is the absolute expiry
//! in Unix seconds. Nothing is stored server side. Redeeming a token does not
//! invalidate it.

use chrono::{DateTime, Duration, Utc};
use common::OfferId;
use domain::Order;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{Result, TokenError};

/// How long an issued offer stays redeemable, in seconds.
pub const DEFAULT_VALIDITY_SECS: i64 = 8 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct OfferClaims {
    order: String,
    exp: i64,
}

/// Issues and redeems offer tokens with a fixed key.
#[derive(Clone)]
pub struct OfferCodec {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl OfferCodec {
    /// Creates a codec signing with HMAC-SHA256 over a shared secret.
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validity: Duration::seconds(DEFAULT_VALIDITY_SECS),
        }
    }

    /// Creates a codec signing with RS256 from a PEM encoded key pair.
    pub fn rs256_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self> {
        let encoding =
            EncodingKey::from_rsa_pem(private_pem).map_err(|e| TokenError::Key(e.to_string()))?;
        let decoding =
            DecodingKey::from_rsa_pem(public_pem).map_err(|e| TokenError::Key(e.to_string()))?;
        Ok(Self {
            algorithm: Algorithm::RS256,
            encoding,
            decoding,
            validity: Duration::seconds(DEFAULT_VALIDITY_SECS),
        })
    }

    /// Overrides the validity window.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// The validity window applied to new tokens.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// The signing algorithm in use.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issues a token for `order`, valid from now.
    pub fn issue(&self, order: &Order) -> Result<OfferId> {
        self.issue_at(order, Utc::now())
    }

    /// Issues a token for `order` as if it were issued at `issued_at`.
    pub fn issue_at(&self, order: &Order, issued_at: DateTime<Utc>) -> Result<OfferId> {
        let claims = OfferClaims {
            order: serde_json::to_string(order).map_err(|e| TokenError::Signing(e.to_string()))?,
            exp: (issued_at + self.validity).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(OfferId::new(token))
    }

    /// Verifies signature and expiry and returns the embedded order.
    pub fn redeem(&self, token: &str) -> Result<Order> {
        // Anything that fails before the signature is verified counts as
        // tampering, whatever the byte that changed.
        jsonwebtoken::decode_header(token).map_err(|_| TokenError::InvalidSignature)?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<OfferClaims>(token, &self.decoding, &validation)
            .map_err(classify)?;

        serde_json::from_str(&data.claims.order).map_err(|e| TokenError::Malformed(e.to_string()))
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::Malformed(err.to_string())
        }
        _ => TokenError::InvalidSignature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ClientId;
    use domain::{Location, Price};

    fn order() -> Order {
        Order {
            from: Location::new(0.0, 0.0),
            to: Location::new(3.0, 4.0),
            client_id: ClientId::new("u1"),
            price: Price::new(297f64.sqrt()),
        }
    }

    fn codec() -> OfferCodec {
        OfferCodec::hs256(b"test-secret")
    }

    fn tamper_payload(token: &str) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        let mid = payload.len() / 2;
        payload[mid] = if payload[mid] == 'A' { 'B' } else { 'A' };
        let payload: String = payload.into_iter().collect();
        format!("{}.{}.{}", parts[0], payload, parts[2])
    }

    #[test]
    fn test_issue_then_redeem() {
        let codec = codec();
        let token = codec.issue(&order()).unwrap();
        assert_eq!(codec.redeem(token.as_str()).unwrap(), order());
    }

    #[test]
    fn test_redeem_twice_succeeds() {
        let codec = codec();
        let token = codec.issue(&order()).unwrap();
        codec.redeem(token.as_str()).unwrap();
        codec.redeem(token.as_str()).unwrap();
    }

    #[test]
    fn test_claims_embed_order_as_string() {
        let codec = codec();
        let token = codec.issue(&order()).unwrap();
        let data = jsonwebtoken::decode::<serde_json::Value>(
            token.as_str(),
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        let embedded = data.claims["order"].as_str().unwrap();
        let parsed: Order = serde_json::from_str(embedded).unwrap();
        assert_eq!(parsed, order());
        assert!(data.claims["exp"].is_i64());
    }

    #[test]
    fn test_expiry_is_eight_hours() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue_at(&order(), now).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = jsonwebtoken::decode::<OfferClaims>(
            token.as_str(),
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap();
        assert_eq!(data.claims.exp, now.timestamp() + 8 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let token = codec
            .issue_at(&order(), Utc::now() - Duration::hours(9))
            .unwrap();
        assert!(matches!(codec.redeem(token.as_str()), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let codec = codec();
        let token = codec.issue(&order()).unwrap();
        let tampered = tamper_payload(token.as_str());
        assert!(matches!(codec.redeem(&tampered), Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_key_fails_signature() {
        let token = codec().issue(&order()).unwrap();
        let other = OfferCodec::hs256(b"other-secret");
        assert!(matches!(other.redeem(token.as_str()), Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_fails_signature() {
        let token = codec().issue(&order()).unwrap();
        let (body, _) = token.as_str().rsplit_once('.').unwrap();
        let extended = format!("{}.extra", token.as_str());

        for garbage in ["not-a-token", body, extended.as_str(), ""] {
            assert!(
                matches!(codec().redeem(garbage), Err(TokenError::InvalidSignature)),
                "{garbage:?}"
            );
        }
    }

    #[test]
    fn test_signed_claims_without_order_are_malformed() {
        #[derive(Serialize)]
        struct Other {
            exp: i64,
        }
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Other {
                exp: Utc::now().timestamp() + 60,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(codec().redeem(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_signed_order_that_does_not_parse_is_malformed() {
        let claims = OfferClaims {
            order: "{\"from\": 1}".into(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(codec().redeem(&token), Err(TokenError::Malformed(_))));
    }
}
