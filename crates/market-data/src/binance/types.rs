//! Binance wire types for the public price ticker and the in-memory price
//! snapshot built from it.

use std::collections::HashMap;

use ob_core::types::Symbol;
use serde::Deserialize;

/// One entry of the `/api/v3/ticker/price` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTickerPrice {
    /// Symbol (uppercase, e.g., `"BTCUSDT"`).
    pub symbol: String,
    /// Last price, sent either as a decimal string or a JSON number.
    pub price: RawPrice,
}

/// A ticker price in either wire form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// `"20500.00000000"`
    Text(String),
    /// `20500.0`
    Number(serde_json::Number),
}

impl From<RawPrice> for String {
    fn from(raw: RawPrice) -> Self {
        match raw {
            RawPrice::Text(s) => s,
            RawPrice::Number(n) => n.to_string(),
        }
    }
}

/// Errors raised when reading a price out of a [`PriceSnapshot`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    /// The exchange did not list the symbol.
    #[error("symbol not found in price snapshot: {0}")]
    SymbolNotFound(String),
    /// The listed price is not a positive finite decimal.
    #[error("invalid price {raw:?} for {symbol} in price snapshot")]
    InvalidPrice { symbol: String, raw: String },
}

/// Point-in-time last prices for every listed symbol.
///
/// Fetched once per run and never refreshed. Prices are kept as the exchange
/// sent them and parsed on lookup so one malformed entry only affects the
/// symbol it belongs to.
#[derive(Debug, Clone, Default)]
pub struct PriceSnapshot {
    prices: HashMap<String, String>,
}

impl PriceSnapshot {
    /// Build a snapshot from `(symbol, price)` pairs. Later duplicates win.
    pub fn from_entries<I, S, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<String>,
    {
        Self {
            prices: entries
                .into_iter()
                .map(|(s, p)| (s.into(), p.into()))
                .collect(),
        }
    }

    /// Current price of `symbol`.
    pub fn price_of(&self, symbol: &Symbol) -> Result<f64, SnapshotError> {
        let raw = self
            .prices
            .get(symbol.as_str())
            .ok_or_else(|| SnapshotError::SymbolNotFound(symbol.to_string()))?;

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(SnapshotError::InvalidPrice {
                symbol: symbol.to_string(),
                raw: raw.clone(),
            }),
        }
    }

    /// Number of symbols in the snapshot.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// `true` when the exchange listed nothing.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl From<Vec<BinanceTickerPrice>> for PriceSnapshot {
    fn from(raw: Vec<BinanceTickerPrice>) -> Self {
        Self::from_entries(raw.into_iter().map(|t| (t.symbol, t.price)))
    }
}
