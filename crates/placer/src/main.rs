//! ob-placer binary
//!
//! Loads the order parameters file and configuration, fetches a price
//! snapshot, synthesizes the batch and submits it to Binance.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ob_core::config::AppConfig;
use ob_core::params::BatchParams;
use ob_execution::binance_rest::BinanceRestClient;
use ob_market_data::binance::TickerClient;
use ob_placer::driver::{check_feasibility, run_batch, write_batch, Feasibility};
use ob_placer::synth::synthesize_batch;

/// Place a randomized batch of Binance limit orders
#[derive(Parser, Debug)]
#[command(name = "ob-placer", about = "Randomized limit-order batch placer for Binance spot")]
struct Args {
    /// Path to the JSON order parameters file.
    #[arg(short, long, default_value = "Frontend.json")]
    params: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON logs.
    #[arg(long)]
    json_logs: bool,

    /// Seed for the order randomizer; entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the batch and the feasibility verdict without submitting.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    ob_core::logging::init_tracing(args.json_logs || config.logging.json)?;

    let params = BatchParams::load(&args.params)?;
    if !args.dry_run {
        config.validate_credentials()?;
    }

    tracing::info!(
        symbol = %params.symbol,
        side = %params.side,
        volume = params.volume,
        number = params.number,
        dry_run = args.dry_run,
        "starting ob-placer"
    );

    let snapshot = TickerClient::new(config.exchange.market_data_url.as_str())
        .fetch_snapshot()
        .await?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let orders = synthesize_batch(&params, &snapshot, &mut rng)
        .context("failed to synthesize order batch")?;

    let mut stdout = std::io::stdout();

    if args.dry_run {
        write_batch(&orders, &mut stdout)?;
        match check_feasibility(&params, &orders) {
            Feasibility::Proceed => println!("feasibility: would submit {} orders", orders.len()),
            Feasibility::Rejected { threshold, total } => println!(
                "feasibility: rejected, price total {total} exceeds threshold {threshold} \
                 by more than {}",
                params.amount_dif
            ),
        }
        return Ok(());
    }

    let gateway = BinanceRestClient::new(
        config.exchange.rest_url.as_str(),
        config.exchange.api_key.as_str(),
        config.exchange.api_secret.as_str(),
    );
    run_batch(&gateway, &params, &orders, &mut stdout).await?;
    Ok(())
}
