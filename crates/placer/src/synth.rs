//! Order batch synthesizer.
//!
//! Turns [`BatchParams`] and a [`PriceSnapshot`] into exactly `number`
//! limit orders. For each order a random integer volume is drawn from the
//! tolerance band `[volume - amountDif, volume + amountDif]` (floored at
//! zero), split evenly across the batch and converted to a base quantity at
//! the snapshot price; the limit price is a random integer in
//! `[priceMin, priceMax]`.

use rand::Rng;

use ob_core::params::BatchParams;
use ob_core::types::OrderRecord;
use ob_market_data::binance::{PriceSnapshot, SnapshotError};

/// Errors that prevent a batch from being synthesized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthError {
    /// The configured symbol has no usable price in the snapshot.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// `priceMin` is above `priceMax`.
    #[error("priceMin {min} is greater than priceMax {max}")]
    InvalidPriceRange { min: i64, max: i64 },
    /// `amountDif` is negative.
    #[error("amountDif must not be negative, got {0}")]
    NegativeTolerance(i64),
}

/// Synthesize the order batch described by `params`.
///
/// The symbol price is looked up once, before any order is drawn, so an
/// unknown symbol fails the whole batch.
pub fn synthesize_batch<R: Rng + ?Sized>(
    params: &BatchParams,
    snapshot: &PriceSnapshot,
    rng: &mut R,
) -> Result<Vec<OrderRecord>, SynthError> {
    if params.amount_dif < 0 {
        return Err(SynthError::NegativeTolerance(params.amount_dif));
    }
    if params.price_min > params.price_max {
        return Err(SynthError::InvalidPriceRange {
            min: params.price_min,
            max: params.price_max,
        });
    }

    let spot = snapshot.price_of(&params.symbol)?;

    // Negative volume would yield a negative quantity.
    let volume_low = params.volume_floor().max(0);
    let volume_high = params.volume_ceiling().max(volume_low);
    let count = f64::from(params.number);

    let orders = (0..params.number)
        .map(|_| {
            let volume = rng.gen_range(volume_low..=volume_high);
            let notional = volume as f64 / count;
            let price = rng.gen_range(params.price_min..=params.price_max);
            OrderRecord::limit(params.symbol.clone(), params.side, notional / spot, price)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        symbol = %params.symbol,
        side = %params.side,
        count = orders.len(),
        spot,
        "order batch synthesized"
    );

    Ok(orders)
}
