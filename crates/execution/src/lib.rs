//! # ob-execution
//!
//! Signed order placement against the Binance spot REST API: HMAC-SHA256
//! request signing, the signed request dispatcher and the [`OrderGateway`]
//! seam used by the submission driver.
//!
//! [`OrderGateway`]: gateway::OrderGateway

pub mod binance_rest;
pub mod gateway;
pub mod signing;
