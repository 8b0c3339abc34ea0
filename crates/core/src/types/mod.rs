//! Core types shared by every ob-placer crate.
//!
//! Enum wire names match the Binance spot REST API so that the same values
//! can be read from the order parameters file and written into signed order
//! payloads without translation.

pub mod order;

// Re-export primary types for convenient access via `ob_core::types::*`.
pub use order::{OrderRecord, OrderType, Side, Symbol, TimeInForce};
