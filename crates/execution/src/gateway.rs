//! Order gateway trait and placement outcome.
//!
//! [`OrderGateway`] is the seam between the submission driver and the
//! exchange: the driver only sees [`PlacementOutcome`]s, and tests swap in an
//! in-memory gateway.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use ob_core::types::OrderRecord;

use crate::binance_rest::{BinanceApiError, BinanceRestClient};

/// Result of one order submission that reached the exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// The exchange accepted the order; the raw response is kept for
    /// reporting.
    Placed(Value),
    /// The exchange answered with an error-code payload.
    Rejected {
        /// Exchange error code (0 if the code was not an integer).
        code: i64,
        /// Exchange error message, empty if absent.
        msg: String,
        /// Raw response.
        raw: Value,
    },
}

impl PlacementOutcome {
    /// Classify a parsed response: any JSON object carrying a `code` field is
    /// a rejection, everything else is a placement.
    pub fn from_response(raw: Value) -> Self {
        if raw.get("code").is_none() {
            return Self::Placed(raw);
        }
        let (code, msg) = match serde_json::from_value::<BinanceApiError>(raw.clone()) {
            Ok(err) => (err.code, err.msg),
            Err(_) => (
                raw.get("code").and_then(Value::as_i64).unwrap_or(0),
                raw.get("msg").and_then(Value::as_str).unwrap_or_default().to_string(),
            ),
        };
        Self::Rejected { code, msg, raw }
    }

    /// `true` for [`PlacementOutcome::Placed`].
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }

    /// The raw exchange response.
    pub fn raw(&self) -> &Value {
        match self {
            Self::Placed(raw) | Self::Rejected { raw, .. } => raw,
        }
    }
}

/// Submits synthesized orders to an exchange.
///
/// `Err` is reserved for failures where no usable answer came back
/// (transport errors, malformed bodies); exchange-side refusals are
/// [`PlacementOutcome::Rejected`].
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit one order.
    async fn place_order(&self, order: &OrderRecord) -> Result<PlacementOutcome>;
}

#[async_trait]
impl OrderGateway for BinanceRestClient {
    async fn place_order(&self, order: &OrderRecord) -> Result<PlacementOutcome> {
        let raw = BinanceRestClient::place_order(self, order).await?;
        Ok(PlacementOutcome::from_response(raw))
    }
}
