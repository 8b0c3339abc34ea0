//! Layered configuration for ob-placer.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (Binance test network for orders, production
//!    endpoint for the public ticker)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `OB_PLACER_`, nested with `__`)
//! 4. Dedicated env vars for credentials (`BINANCE_API_KEY`,
//!    `BINANCE_API_SECRET`)
//!
//! Credentials **must** come from environment variables, never from
//! configuration files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Env var holding the Binance API key.
pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
/// Env var holding the Binance API secret.
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

/// Default order endpoint: Binance spot test network.
pub const DEFAULT_REST_URL: &str = "https://testnet.binance.vision";
/// Default ticker endpoint: Binance spot production.
pub const DEFAULT_MARKET_DATA_URL: &str = "https://api.binance.com";

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Binance connection settings.
    pub exchange: ExchangeConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Exchange connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// API key, only ever taken from `BINANCE_API_KEY`.
    #[serde(skip)]
    pub api_key: String,
    /// API secret, only ever taken from `BINANCE_API_SECRET`.
    #[serde(skip)]
    pub api_secret: String,
    /// Base URL for signed order requests.
    pub rest_url: String,
    /// Base URL for the public price ticker.
    pub market_data_url: String,
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON logs instead of pretty-printed ones.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// Credentials are read but not validated here; call
    /// [`validate_credentials`](Self::validate_credentials) before signing
    /// anything.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("exchange.rest_url", DEFAULT_REST_URL)?
            .set_default("exchange.market_data_url", DEFAULT_MARKET_DATA_URL)?
            .set_default("logging.json", false)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (OB_PLACER_ prefix) ────────
        // The prefix separator is set to `_` explicitly; otherwise the
        // `config` crate reuses `__` and `OB_PLACER_EXCHANGE__REST_URL`
        // would not match.
        builder = builder.add_source(
            Environment::with_prefix("OB_PLACER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        // ── Layer 4: dedicated credential env vars ─────────────────
        // Skipped during deserialization, so file and `OB_PLACER_` values
        // never reach these fields.
        cfg.exchange.api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
        cfg.exchange.api_secret = std::env::var(API_SECRET_VAR).unwrap_or_default();

        Ok(cfg)
    }

    /// Fail unless both credentials are present and non-empty.
    ///
    /// The error names the missing environment variable.
    pub fn validate_credentials(&self) -> Result<()> {
        if self.exchange.api_key.trim().is_empty() {
            bail!("{API_KEY_VAR} is not set; it is required to sign orders");
        }
        if self.exchange.api_secret.trim().is_empty() {
            bail!("{API_SECRET_VAR} is not set; it is required to sign orders");
        }
        Ok(())
    }
}
