//! # ob-market-data
//!
//! Public market data for ob-placer: a one-shot Binance price ticker
//! snapshot used to convert order notionals into base quantities.

pub mod binance;
