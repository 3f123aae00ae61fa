//! Every single-byte change to an issued token must fail signature checks.

use common::ClientId;
use domain::{Location, OfferRequest};
use offering::{OfferCodec, OfferService, TokenError};

fn issued_token(codec: &OfferCodec) -> String {
    OfferService::new(codec.clone())
        .create_offer(OfferRequest {
            from: Location::new(55.75, 37.61),
            to: Location::new(55.80, 37.70),
            client_id: ClientId::new("u1"),
        })
        .unwrap()
        .offer_id
        .as_str()
        .to_string()
}

#[test]
fn test_every_altered_hs256_byte_is_rejected() {
    let codec = OfferCodec::hs256(b"tamper-secret");
    let token = issued_token(&codec);
    assert!(codec.redeem(&token).is_ok());

    for index in 0..token.len() {
        for replacement in [b'A', b'.', b'z'] {
            let mut bytes = token.clone().into_bytes();
            if bytes[index] == replacement {
                continue;
            }
            bytes[index] = replacement;
            let altered = String::from_utf8(bytes).unwrap();

            let result = codec.redeem(&altered);
            assert!(
                matches!(result, Err(TokenError::InvalidSignature)),
                "byte {index} -> {:?}: {result:?}",
                replacement as char
            );
        }
    }
}
