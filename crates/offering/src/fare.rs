//! Fare calculation.
//!
//! The longitude term of the distance is scaled by a weak per-client hash.
//! This weighting is reproduced exactly, including the fact that it only
//! touches one axis, so fares stay identical for every client id.

use domain::{Location, Price};

const HASH_PRIME: u64 = 23;
const HASH_MODULUS: u64 = 100;

/// Deterministic, non-cryptographic weight in `0..100` derived from a client id.
pub fn client_weight(client_id: &str) -> u64 {
    client_id
        .bytes()
        .fold(0, |hash, byte| (hash + u64::from(byte) * HASH_PRIME) % HASH_MODULUS)
}

/// Quotes the fare for a route on behalf of `client_id`.
pub fn quote(client_id: &str, from: Location, to: Location) -> Price {
    let d_lat = from.lat - to.lat;
    let d_lng = from.lng - to.lng;
    let weight = client_weight(client_id) as f64;
    Price::new((d_lat * d_lat + d_lng * d_lng * weight).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DEFAULT_CURRENCY;

    #[test]
    fn test_client_weight() {
        assert_eq!(client_weight(""), 0);
        // 'u' = 117, '1' = 49: (117 * 23) % 100 = 91, (91 + 49 * 23) % 100 = 18
        assert_eq!(client_weight("u1"), 18);
        assert!(client_weight("some-long-client-identifier") < 100);
    }

    #[test]
    fn test_quote_weights_longitude_only() {
        let price = quote("u1", Location::new(0.0, 0.0), Location::new(3.0, 4.0));
        assert_eq!(price.amount, (9.0_f64 + 16.0 * 18.0).sqrt());
        assert_eq!(price.currency, DEFAULT_CURRENCY);

        let lat_only = quote("u1", Location::new(0.0, 0.0), Location::new(3.0, 0.0));
        assert_eq!(lat_only.amount, 3.0);
    }

    #[test]
    fn test_quote_is_deterministic() {
        let from = Location::new(55.75, 37.61);
        let to = Location::new(55.80, 37.50);
        assert_eq!(quote("client-7", from, to), quote("client-7", from, to));
    }

    #[test]
    fn test_quote_same_point_is_zero() {
        let here = Location::new(10.0, 20.0);
        assert_eq!(quote("anyone", here, here).amount, 0.0);
    }

    #[test]
    fn test_zero_weight_ignores_longitude() {
        let price = quote("", Location::new(0.0, 0.0), Location::new(0.0, 5.0));
        assert_eq!(price.amount, 0.0);
    }
}
