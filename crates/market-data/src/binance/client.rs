//! Binance public REST client for the price ticker.
//!
//! [`TickerClient`] issues a single unauthenticated
//! `GET /api/v3/ticker/price` and turns the listing into a [`PriceSnapshot`].

use anyhow::{bail, Context, Result};
use reqwest::Client;

use super::types::{BinanceTickerPrice, PriceSnapshot};

/// Path of the all-symbols last price endpoint.
pub const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";

/// Unauthenticated client for Binance market data endpoints.
pub struct TickerClient {
    base_url: String,
    client: Client,
}

impl TickerClient {
    /// Create a ticker client for `base_url` (e.g. `https://api.binance.com`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Full URL of the ticker endpoint.
    pub fn ticker_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TICKER_PRICE_PATH)
    }

    /// Fetch last prices for every listed symbol.
    ///
    /// Transport failures, non-success statuses and malformed bodies are
    /// returned as errors; nothing is retried.
    pub async fn fetch_snapshot(&self) -> Result<PriceSnapshot> {
        let url = self.ticker_url();
        tracing::info!(url = %url, "fetching price snapshot");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Binance GET /api/v3/ticker/price request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("failed to read response body")?;

        if !status.is_success() {
            bail!("Binance HTTP {} on ticker request: {}", status, body);
        }

        let snapshot = parse_snapshot(&body)?;
        tracing::info!(symbols = snapshot.len(), "price snapshot received");
        Ok(snapshot)
    }
}

/// Parse a ticker response body.
pub fn parse_snapshot(body: &str) -> Result<PriceSnapshot> {
    let raw: Vec<BinanceTickerPrice> =
        serde_json::from_str(body).context("failed to deserialize price ticker")?;
    Ok(PriceSnapshot::from(raw))
}
