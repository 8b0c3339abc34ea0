//! Order parameters file.
//!
//! The batch to place is described by a flat JSON object:
//!
//! ```json
//! {"symbol": "BTCUSDT", "side": "BUY", "volume": 1000, "number": 2,
//!  "amountDif": 50, "priceMin": 20000, "priceMax": 21000}
//! ```
//!
//! Every key in [`REQUIRED_FIELDS`] must be present. Presence is checked
//! before typed deserialization so that the error names the first missing
//! key rather than a generic serde message. Range checks are left to the
//! synthesizer; loading only guarantees shape.

use std::path::Path;

use serde::Deserialize;

use crate::types::{Side, Symbol};

/// Keys that must appear in the parameters object, in the order they are
/// checked.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "volume",
    "number",
    "amountDif",
    "side",
    "priceMin",
    "priceMax",
    "symbol",
];

/// Errors raised while loading order parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// The file could not be read.
    #[error("failed to read order parameters from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON, not an object, or a field has the
    /// wrong type.
    #[error("invalid order parameters: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level JSON value is not an object.
    #[error("order parameters must be a JSON object")]
    NotAnObject,
    /// A required key is absent.
    #[error("missing field in order parameters: {0}")]
    MissingField(&'static str),
}

/// Parameters describing one randomized order batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchParams {
    /// Trading pair to place orders on.
    pub symbol: Symbol,
    /// Side shared by every order in the batch.
    pub side: Side,
    /// Target notional of the whole batch, in quote currency.
    pub volume: i64,
    /// Number of orders to synthesize.
    pub number: u32,
    /// Tolerance around `volume`, in quote currency.
    #[serde(rename = "amountDif")]
    pub amount_dif: i64,
    /// Lowest limit price (inclusive).
    #[serde(rename = "priceMin")]
    pub price_min: i64,
    /// Highest limit price (inclusive).
    #[serde(rename = "priceMax")]
    pub price_max: i64,
}

impl BatchParams {
    /// Read and parse an order parameters file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse order parameters from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ParamsError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(ParamsError::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(ParamsError::MissingField(*missing));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Lower edge of the volume tolerance band, `volume - amountDif`.
    pub fn volume_floor(&self) -> i64 {
        self.volume.saturating_sub(self.amount_dif)
    }

    /// Upper edge of the volume tolerance band, `volume + amountDif`.
    pub fn volume_ceiling(&self) -> i64 {
        self.volume.saturating_add(self.amount_dif)
    }
}
