//! Binance public price ticker client and wire types.

pub mod client;
pub mod types;

pub use client::{parse_snapshot, TickerClient, TICKER_PRICE_PATH};
pub use types::{BinanceTickerPrice, PriceSnapshot, RawPrice, SnapshotError};
