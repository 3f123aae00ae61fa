use chrono::{Duration, Utc};
use common::ClientId;
use domain::{Location, OfferRequest};
use offering::{OfferCodec, OfferService, TokenError};

const PRIVATE_PEM: &[u8] = include_bytes!("fixtures/offer_private.pem");
const PUBLIC_PEM: &[u8] = include_bytes!("fixtures/offer_public.pem");

fn rsa_codec() -> OfferCodec {
    OfferCodec::rs256_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap()
}

fn request() -> OfferRequest {
    OfferRequest {
        from: Location::new(0.0, 0.0),
        to: Location::new(3.0, 4.0),
        client_id: ClientId::new("u1"),
    }
}

#[test]
fn test_rs256_issue_and_redeem() {
    let service = OfferService::new(rsa_codec());
    let offer = service.create_offer(request()).unwrap();

    let order = service.redeem(offer.offer_id.as_str()).unwrap();
    assert_eq!(order, offer.order);
    assert_eq!(order.price.amount, 297f64.sqrt());
}

#[test]
fn test_rs256_header_names_algorithm() {
    let offer = OfferService::new(rsa_codec())
        .create_offer(request())
        .unwrap();
    let header = jsonwebtoken::decode_header(offer.offer_id.as_str()).unwrap();
    assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
}

#[test]
fn test_rs256_expired() {
    let codec = rsa_codec();
    let order = OfferService::new(codec.clone())
        .create_offer(request())
        .unwrap()
        .order;
    let token = codec
        .issue_at(&order, Utc::now() - Duration::hours(9))
        .unwrap();

    assert!(matches!(
        codec.redeem(token.as_str()),
        Err(TokenError::Expired)
    ));
}

#[test]
fn test_any_altered_signature_byte_is_rejected() {
    let codec = rsa_codec();
    let token = codec
        .issue(&OfferService::new(codec.clone()).create_offer(request()).unwrap().order)
        .unwrap();
    let (body, signature) = token.as_str().rsplit_once('.').unwrap();

    for index in [0, signature.len() / 3, signature.len() / 2] {
        let mut chars: Vec<char> = signature.chars().collect();
        chars[index] = if chars[index] == 'x' { 'y' } else { 'x' };
        let altered: String = chars.into_iter().collect();

        let result = codec.redeem(&format!("{body}.{altered}"));
        assert!(
            matches!(result, Err(TokenError::InvalidSignature)),
            "index {index}: {result:?}"
        );
    }
}

#[test]
fn test_hs256_token_rejected_by_rs256_codec() {
    let token = OfferService::new(OfferCodec::hs256(b"secret"))
        .create_offer(request())
        .unwrap()
        .offer_id;
    assert!(matches!(
        rsa_codec().redeem(token.as_str()),
        Err(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_bad_pem_is_key_error() {
    assert!(matches!(
        OfferCodec::rs256_pem(b"not a key", PUBLIC_PEM),
        Err(TokenError::Key(_))
    ));
}

#[test]
fn test_custom_validity() {
    let codec = OfferCodec::hs256(b"s").with_validity(Duration::minutes(5));
    let order = OfferService::new(codec.clone())
        .create_offer(request())
        .unwrap()
        .order;

    let recent = codec
        .issue_at(&order, Utc::now() - Duration::minutes(4))
        .unwrap();
    assert!(codec.redeem(recent.as_str()).is_ok());

    let stale = codec
        .issue_at(&order, Utc::now() - Duration::minutes(6))
        .unwrap();
    assert!(matches!(codec.redeem(stale.as_str()), Err(TokenError::Expired)));
}
