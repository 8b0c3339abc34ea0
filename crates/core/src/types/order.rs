//! Order-related types: side, order type, time-in-force, symbol and the
//! synthesized order record.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy / long.
    Buy,
    /// Sell / short.
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.pad("BUY"),
            Side::Sell => f.pad("SELL"),
        }
    }
}

/// Order type. Only resting limit orders are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order with specified price.
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => f.pad("LIMIT"),
        }
    }
}

/// Time-in-force policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Gtc => f.pad("GTC"),
        }
    }
}

/// Trading pair symbol (e.g., "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Symbol {
    /// Create a new symbol.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Number of decimals kept on order quantities.
pub const QUANTITY_DECIMALS: i32 = 3;

/// A synthesized limit order, ready to be signed and submitted.
///
/// Serializes to the Binance `POST /api/v3/order` parameters in a fixed
/// order: `symbol, side, type, timeInForce, quantity, price`. The quantity is
/// always written with [`QUANTITY_DECIMALS`] decimals so the exchange never
/// sees exponent notation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Trading pair.
    pub symbol: Symbol,
    /// Order side.
    pub side: Side,
    /// Order type, always [`OrderType::Limit`].
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Time-in-force, always [`TimeInForce::Gtc`].
    #[serde(rename = "timeInForce")]
    pub time_in_force: TimeInForce,
    /// Base-asset quantity, already rounded.
    #[serde(serialize_with = "serialize_quantity")]
    pub quantity: f64,
    /// Integer limit price in quote currency.
    pub price: i64,
}

impl OrderRecord {
    /// Build a GTC limit order, rounding `quantity` to three decimals.
    pub fn limit(symbol: Symbol, side: Side, quantity: f64, price: i64) -> Self {
        Self {
            symbol,
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            quantity: round_quantity(quantity),
            price,
        }
    }
}

/// Round a quantity to [`QUANTITY_DECIMALS`] places.
pub fn round_quantity(quantity: f64) -> f64 {
    let factor = 10f64.powi(QUANTITY_DECIMALS);
    (quantity * factor).round() / factor
}

fn serialize_quantity<S: Serializer>(quantity: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.*}", QUANTITY_DECIMALS as usize, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Buy), "BUY");
        assert_eq!(format!("{}", Side::Sell), "SELL");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:<5}|", Side::Buy), "BUY  |");
        assert_eq!(format!("{:<6}|", OrderType::Limit), "LIMIT |");
        assert_eq!(format!("{:>4}|", TimeInForce::Gtc), " GTC|");
        assert_eq!(format!("{:<9}|", Symbol::new("BTCUSDT")), "BTCUSDT  |");
    }

    #[test]
    fn test_side_wire_names() {
        let side: Side = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(side, Side::Sell);
        assert!(serde_json::from_str::<Side>("\"sell\"").is_err());
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
    }

    #[test]
    fn test_symbol() {
        let s = Symbol::new("BTCUSDT");
        assert_eq!(format!("{}", s), "BTCUSDT");
        assert_eq!(s.as_str(), "BTCUSDT");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"BTCUSDT\"");
    }

    #[test]
    fn test_round_quantity() {
        assert_eq!(round_quantity(0.024390), 0.024);
        assert_eq!(round_quantity(0.0245001), 0.025);
        assert_eq!(round_quantity(0.0), 0.0);
    }

    #[test]
    fn test_limit_order_defaults() {
        let order = OrderRecord::limit(Symbol::new("BTCUSDT"), Side::Buy, 0.123456, 20500);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert_eq!(order.quantity, 0.123);
        assert_eq!(order.price, 20500);
    }

    #[test]
    fn test_order_record_json_keys() {
        let order = OrderRecord::limit(Symbol::new("BTCUSDT"), Side::Sell, 0.02, 20750);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["symbol"], "BTCUSDT");
        assert_eq!(json["side"], "SELL");
        assert_eq!(json["type"], "LIMIT");
        assert_eq!(json["timeInForce"], "GTC");
        assert_eq!(json["quantity"], "0.020");
        assert_eq!(json["price"], 20750);
    }
}
