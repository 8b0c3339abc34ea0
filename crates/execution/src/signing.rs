//! HMAC-SHA256 request signing for the Binance REST API.
//!
//! Uses the `ring` crate for constant-time HMAC computation, avoiding
//! OpenSSL dependencies. Secrets are never logged or included in error
//! messages.

use ring::hmac;
use serde::Serialize;

/// Sign a Binance REST API request.
///
/// Binance signs the query string: `HMAC-SHA256(secret, query_string)`.
/// The resulting lowercase hex signature is appended as `&signature=...`.
pub fn sign_binance_request(secret: &str, query_string: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let signature = hmac::sign(&key, query_string.as_bytes());
    hex::encode(signature.as_ref())
}

/// URL-encode a payload into `key=value&key=value`.
///
/// Field order follows the payload's `Serialize` implementation (declaration
/// order for derived structs), so the output is deterministic for a given
/// value.
pub fn canonical_query<P: Serialize + ?Sized>(
    payload: &P,
) -> Result<String, serde_urlencoded::ser::Error> {
    serde_urlencoded::to_string(payload)
}

/// A canonical query string with its timestamp appended, and its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// The signed input: payload parameters followed by `timestamp=<ms>`.
    pub query: String,
    /// Lowercase hex HMAC-SHA256 of `query`.
    pub signature: String,
}

impl SignedQuery {
    /// Append `timestamp=<timestamp_ms>` to `query` and sign the result.
    pub fn new(secret: &str, query: &str, timestamp_ms: u64) -> Self {
        let query = if query.is_empty() {
            format!("timestamp={timestamp_ms}")
        } else {
            format!("{query}&timestamp={timestamp_ms}")
        };
        let signature = sign_binance_request(secret, &query);
        Self { query, signature }
    }

    /// The query as sent on the wire: `query&signature=<hex>`.
    pub fn to_url_query(&self) -> String {
        format!("{}&signature={}", self.query, self.signature)
    }
}
