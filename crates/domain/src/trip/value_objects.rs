//! Value objects for the trip domain.

use common::ClientId;
use serde::{Deserialize, Serialize};

/// Currency every fare is quoted in.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// A point on the map in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Creates a location from latitude and longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A fare: non-negative amount plus currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    /// Creates a price in the default currency.
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

/// A request for an offer: the route a client wants priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub from: Location,
    pub to: Location,
    pub client_id: ClientId,
}

/// A priced route. This is what an offer token embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub from: Location,
    pub to: Location,
    pub client_id: ClientId,
    pub price: Price,
}

impl Order {
    /// Attaches a fare to an offer request.
    pub fn priced(request: OfferRequest, price: Price) -> Self {
        Self {
            from: request.from,
            to: request.to,
            client_id: request.client_id,
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_defaults_to_rub() {
        let price = Price::new(12.5);
        assert_eq!(price.currency, "RUB");
        assert_eq!(price.to_string(), "12.50 RUB");
    }

    #[test]
    fn test_order_wire_shape() {
        let order = Order::priced(
            OfferRequest {
                from: Location::new(55.75, 37.61),
                to: Location::new(55.80, 37.70),
                client_id: ClientId::new("u1"),
            },
            Price::new(3.0),
        );

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["from"]["lat"], 55.75);
        assert_eq!(json["to"]["lng"], 37.70);
        assert_eq!(json["client_id"], "u1");
        assert_eq!(json["price"]["amount"], 3.0);
        assert_eq!(json["price"]["currency"], "RUB");
    }

    #[test]
    fn test_offer_request_ignores_price_field() {
        let request: OfferRequest = serde_json::from_value(serde_json::json!({
            "from": {"lat": 0.0, "lng": 0.0},
            "to": {"lat": 3.0, "lng": 4.0},
            "client_id": "u1",
            "price": {"amount": 100.0, "currency": "USD"}
        }))
        .unwrap();
        assert_eq!(request.to, Location::new(3.0, 4.0));
    }
}
