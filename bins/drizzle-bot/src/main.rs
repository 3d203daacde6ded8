//! Drizzle distribution bot.
//!
//! Connects to a ledger node over JSON-RPC, then runs the reward cycle loop:
//! scan the holder set of the tracked token, filter by holding thresholds,
//! allocate the per-cycle reward proportionally, and execute the transfers.
//! Runs until interrupted; Ctrl-C finishes the current phase cleanly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use drizzle_core::config::BotConfig;
use drizzle_core::constants::{
    DEFAULT_CYCLE_INTERVAL_SECS, DEFAULT_MAX_CONCURRENT_TRANSFERS, DEFAULT_MAX_HOLDING,
    DEFAULT_MIN_HOLDING, DEFAULT_RETRY_ATTEMPT_CAP, DEFAULT_REWARD_PER_CYCLE,
};
use drizzle_core::traits::{LedgerClient, TransferSigner};
use drizzle_core::types::Address;
use drizzle_engine::{CycleScheduler, ExecutorConfig, TransferExecutor};
use drizzle_ledger::{KeypairSigner, RpcLedgerClient};

/// Environment variable holding the distribution wallet secret key
/// (hex or base58). Never passed on the command line.
const SIGNER_KEY_ENV: &str = "DRIZZLE_SIGNER_KEY";

/// CLI arguments for the bot.
#[derive(Debug, Parser)]
#[command(name = "drizzle-bot")]
#[command(about = "Proportional token-holder reward distribution bot", long_about = None)]
struct Args {
    /// RPC server endpoint.
    #[arg(long, default_value = "http://127.0.0.1:18332")]
    rpc_endpoint: String,

    /// Address of the token whose holders are rewarded (required).
    #[arg(long)]
    token: Address,

    /// Address of the asset distributed as rewards (required).
    #[arg(long)]
    reward_asset: Address,

    /// Total reward per cycle, in reward-asset base units.
    #[arg(long, default_value_t = DEFAULT_REWARD_PER_CYCLE)]
    reward_per_cycle: u64,

    /// Seconds between cycle starts.
    #[arg(long, default_value_t = DEFAULT_CYCLE_INTERVAL_SECS)]
    interval_secs: u64,

    /// Minimum aggregated holding for eligibility (inclusive).
    #[arg(long, default_value_t = DEFAULT_MIN_HOLDING)]
    min_holding: u64,

    /// Maximum aggregated holding for eligibility (inclusive).
    #[arg(long, default_value_t = DEFAULT_MAX_HOLDING)]
    max_holding: u64,

    /// Maximum concurrent transfers per cycle.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_TRANSFERS)]
    concurrency: usize,

    /// Submission attempts per transfer before recording failure.
    #[arg(long, default_value_t = DEFAULT_RETRY_ATTEMPT_CAP)]
    retry_cap: u32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("drizzle-bot v{}", env!("CARGO_PKG_VERSION"));
    info!("RPC endpoint: {}", args.rpc_endpoint);
    info!("token: {}", args.token);
    info!("reward asset: {}", args.reward_asset);

    let config = BotConfig {
        token_address: args.token,
        reward_asset: args.reward_asset,
        total_reward_per_cycle: args.reward_per_cycle,
        cycle_interval: Duration::from_secs(args.interval_secs),
        min_holding: args.min_holding,
        max_holding: args.max_holding,
        max_concurrent_transfers: args.concurrency,
        retry_attempt_cap: args.retry_cap,
        ..BotConfig::default()
    };
    config.validate().context("invalid configuration")?;
    info!(
        "reward {} per cycle every {}s, holdings {}..={}, concurrency {}",
        config.total_reward_per_cycle,
        args.interval_secs,
        config.min_holding,
        config.max_holding,
        config.max_concurrent_transfers,
    );

    // Load the signing key from the environment so it never appears in argv.
    let Ok(secret) = std::env::var(SIGNER_KEY_ENV) else {
        bail!("{SIGNER_KEY_ENV} is not set");
    };
    let signer = KeypairSigner::from_secret_str(&secret).context("invalid signer key")?;
    let source = signer.source();
    info!("distribution wallet: {source}");

    // Connect and probe before entering the loop.
    let client = Arc::new(
        RpcLedgerClient::new(&args.rpc_endpoint).context("failed to create RPC client")?,
    );
    let height = client
        .ping()
        .await
        .context("failed to connect to RPC server")?;
    info!("connected to RPC server at height {height}");

    let balance = client
        .asset_balance(&source, &config.reward_asset)
        .await
        .context("failed to fetch distribution wallet balance")?;
    info!("distribution wallet balance: {balance}");
    if balance < config.total_reward_per_cycle {
        warn!(
            "balance {} is below the per-cycle reward {}; first cycle will abort unless funded",
            balance, config.total_reward_per_cycle
        );
    }

    // Set up signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        warn!("received SIGINT, shutting down...");
        running_clone.store(false, Ordering::Relaxed);
    });

    let executor = TransferExecutor::new(
        Arc::clone(&client),
        Arc::new(signer),
        ExecutorConfig::from(&config),
    );
    let mut scheduler = CycleScheduler::new(Arc::clone(&client), executor, config, running);

    let totals = scheduler.run().await;

    info!(
        "shutdown complete: {} cycles completed, {} aborted | transfers: {} succeeded, {} failed, {} skipped | {} distributed",
        totals.cycles_completed,
        totals.cycles_aborted,
        totals.transfers_succeeded,
        totals.transfers_failed,
        totals.transfers_skipped,
        totals.total_distributed,
    );
    Ok(())
}
