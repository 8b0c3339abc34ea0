//! Tracing initialization for ob-placer.
//!
//! [`init_tracing`] installs one of two output modes:
//! - **JSON** (`json = true`): one object per line with nanosecond UTC
//!   timestamps, for log shipping.
//! - **Pretty** (`json = false`): human-readable output for interactive runs.
//!
//! Both honour `RUST_LOG` (e.g. `RUST_LOG=ob_execution=debug`) and default to
//! `info`. Logs go to stderr; stdout carries the order report. A
//! [`SecretSanitizer`] layer warns whenever an event or span carries
//! a field that looks like a credential or a request signature.

use std::fmt;

use anyhow::{anyhow, Result};
use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global tracing subscriber.
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(SecretSanitizer);

    let installed = if json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(NanosecondTimer)
            .with_target(true)
            .with_writer(std::io::stderr);
        registry.with(json_layer).try_init()
    } else {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(pretty_layer).try_init()
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// UTC timer with nanosecond precision for JSON logs.
#[derive(Debug, Clone)]
struct NanosecondTimer;

impl tracing_subscriber::fmt::time::FormatTime for NanosecondTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.9fZ"))
    }
}

/// Layer that flags events and spans carrying credential-like fields.
///
/// A field trips the check when its name is in [`SENSITIVE_FIELD_NAMES`] or
/// its string value looks like a Binance API key (64 alphanumerics) or a hex
/// HMAC digest.
#[derive(Debug, Clone)]
pub struct SecretSanitizer;

impl<S> Layer<S> for SecretSanitizer
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &span::Attributes<'_>,
        _id: &span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = SecretCheckVisitor::default();
        attrs.record(&mut visitor);
        if visitor.found_secret {
            tracing::warn!(
                "credential-like value recorded on a span; keep keys and signatures out of logs"
            );
        }
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = SecretCheckVisitor::default();
        event.record(&mut visitor);
        if visitor.found_secret {
            tracing::warn!(
                "credential-like value recorded on an event; keep keys and signatures out of logs"
            );
        }
    }
}

#[derive(Default)]
struct SecretCheckVisitor {
    found_secret: bool,
}

/// Field names that always count as secrets regardless of value.
const SENSITIVE_FIELD_NAMES: &[&str] = &["api_key", "api_secret", "secret", "signature"];

impl SecretCheckVisitor {
    fn looks_like_secret(value: &str) -> bool {
        if value.len() < 32 || value.contains(char::is_whitespace) {
            return false;
        }
        let api_key_like = value.len() >= 64 && value.chars().all(|c| c.is_ascii_alphanumeric());
        let digest_like = value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit());
        api_key_like || digest_like
    }
}

impl Visit for SecretCheckVisitor {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        if SENSITIVE_FIELD_NAMES.contains(&field.name()) {
            self.found_secret = true;
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if SENSITIVE_FIELD_NAMES.contains(&field.name()) || Self::looks_like_secret(value) {
            self.found_secret = true;
        }
    }
}
