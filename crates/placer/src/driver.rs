//! Submission driver: feasibility gate followed by sequential placement.
//!
//! The whole batch is checked before anything is sent. Orders are then
//! submitted one at a time in generation order; an exchange rejection is
//! reported and skipped, a transport failure aborts the run.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ob_core::params::BatchParams;
use ob_core::types::{OrderRecord, Side};
use ob_execution::gateway::{OrderGateway, PlacementOutcome};

/// Outcome of the pre-submission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// The batch may be submitted.
    Proceed,
    /// The batch exceeds the volume tolerance; nothing is submitted.
    Rejected {
        /// `volume - amountDif`.
        threshold: i64,
        /// Sum of every order's limit price.
        total: i64,
    },
}

/// Gate a batch on its aggregate limit price.
///
/// A batch is within tolerance when the price total exceeds the threshold
/// `volume - amountDif` by no more than `amountDif`. BUY batches must be
/// within tolerance; SELL batches always proceed.
pub fn check_feasibility(params: &BatchParams, orders: &[OrderRecord]) -> Feasibility {
    let threshold = params.volume_floor();
    let total = orders
        .iter()
        .fold(0i64, |acc, order| acc.saturating_add(order.price));
    let within_tolerance = total.saturating_sub(threshold) <= params.amount_dif;

    match params.side {
        Side::Sell => Feasibility::Proceed,
        Side::Buy if within_tolerance => Feasibility::Proceed,
        Side::Buy => Feasibility::Rejected { threshold, total },
    }
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Result of the feasibility gate.
    pub feasibility: Feasibility,
    /// Orders sent to the gateway.
    pub submitted: usize,
    /// Orders the exchange accepted.
    pub placed: usize,
    /// Orders the exchange answered with an error code.
    pub rejected: usize,
}

/// Check feasibility, then submit `orders` through `gateway`, writing a
/// human-readable line per outcome to `out`.
pub async fn run_batch<G, W>(
    gateway: &G,
    params: &BatchParams,
    orders: &[OrderRecord],
    out: &mut W,
) -> Result<RunReport>
where
    G: OrderGateway + ?Sized,
    W: Write,
{
    let feasibility = check_feasibility(params, orders);
    let mut report = RunReport {
        feasibility,
        submitted: 0,
        placed: 0,
        rejected: 0,
    };

    if let Feasibility::Rejected { threshold, total } = feasibility {
        warn!(threshold, total, side = %params.side, "batch rejected by feasibility check");
        writeln!(
            out,
            "Sum of all order prices ({total}) exceeds the minimum balance threshold \
             {threshold} by more than {}; no orders submitted",
            params.amount_dif
        )?;
        return Ok(report);
    }

    info!(count = orders.len(), symbol = %params.symbol, side = %params.side, "submitting batch");

    for (index, order) in orders.iter().enumerate() {
        let outcome = gateway
            .place_order(order)
            .await
            .with_context(|| format!("failed to submit order {} of {}", index + 1, orders.len()))?;
        report.submitted += 1;

        let raw = outcome.raw();
        if outcome.is_placed() {
            report.placed += 1;
            info!(index, price = order.price, quantity = order.quantity, "order placed");
            let price = raw
                .get("price")
                .and_then(|p| p.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| order.price.to_string());
            writeln!(
                out,
                "{} order placed at {} for quantity {:.3}\nBinance response:\n{}\n",
                params.side, price, order.quantity, raw
            )?;
        } else {
            report.rejected += 1;
            if let PlacementOutcome::Rejected { code, msg, .. } = &outcome {
                warn!(index, code, msg = %msg, "order rejected by exchange");
            }
            writeln!(out, "{raw}")?;
        }
    }

    info!(
        submitted = report.submitted,
        placed = report.placed,
        rejected = report.rejected,
        "batch finished"
    );
    Ok(report)
}

/// Write the batch as a table, one order per line.
pub fn write_batch<W: Write>(orders: &[OrderRecord], out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>3}  {:<12} {:<4} {:<5} {:<3} {:>12} {:>12}",
        "#", "symbol", "side", "type", "tif", "quantity", "price"
    )?;
    for (index, order) in orders.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<12} {:<4} {:<5} {:<3} {:>12.3} {:>12}",
            index + 1,
            order.symbol,
            order.side,
            order.order_type,
            order.time_in_force,
            order.quantity,
            order.price
        )?;
    }
    Ok(())
}
