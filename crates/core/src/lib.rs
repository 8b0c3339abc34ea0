//! # ob-core
//!
//! Shared building blocks for ob-placer: Binance-compatible order types, the
//! order parameters file, layered application configuration and tracing
//! setup.

pub mod config;
pub mod logging;
pub mod params;
pub mod types;
