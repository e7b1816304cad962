//! Balanced Stats - Main Entry Point
//!
//! Long-running aggregator: polls chain and backend data on a fixed
//! interval, prints the protocol overview and appends JSONL snapshots.

use balanced_stats::*;
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{info, warn, error};

use balanced_stats::metrics::StatsEngine;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration
    let config = Config::load();

    info!("📊 Balanced Stats Aggregator v0.3.0");
    info!("📋 Configuration:");
    info!("   RPC URL: {}", config.rpc_url);
    info!("   Stats API: {}", config.stats_api_url);
    info!("   Blocks API: {}", config.blocks_api_url);
    info!("   Refresh interval: {}s", config.refresh_interval_secs);
    info!("   Comparison period: {} day(s)", config.comparison_days);
    info!("   LP emission allocation: {}", config.lp_allocation);

    // Setup network clients
    let provider = network::setup_provider(&config).await?;
    let http = network::build_http_client(&config)?;
    let backend = backend::BackendClient::new(
        http,
        config.stats_api_url.clone(),
        config.blocks_api_url.clone(),
    );

    let engine = Arc::new(StatsEngine::new(&config, provider, backend));

    // Setup session state
    let start_time = Instant::now();
    let mut session = SessionState::new();

    // Setup shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    let shutdown_tx = Arc::new(tokio::sync::Mutex::new(Some(shutdown_tx)));

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        if let Some(tx) = shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
    });

    info!("\n🚀 Starting refresh loop...\n");

    let mut interval = time::interval(Duration::from_secs(config.refresh_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_refresh_cycle(&engine, &mut session).await {
                    error!("Refresh cycle error: {}", e);
                    *session.error_counts.entry("cycle".to_string()).or_insert(0) += 1;
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received, exiting refresh loop...");
                break;
            }
        }
    }

    print_final_statistics(start_time, &session);

    Ok(())
}

/// Session state to track refresh statistics
struct SessionState {
    cycles: u64,
    overviews_published: u64,
    snapshots_saved: u64,
    error_counts: HashMap<String, u32>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            cycles: 0,
            overviews_published: 0,
            snapshots_saved: 0,
            error_counts: HashMap::new(),
        }
    }
}

/// Run a single refresh cycle: refresh the cached queries, then assemble
/// and publish the overview once all inputs have resolved. Individual
/// query failures are logged and counted, never fatal; the previous cached
/// values stay in effect until superseded.
async fn run_refresh_cycle(engine: &StatsEngine, session: &mut SessionState) -> Result<()> {
    session.cycles += 1;

    let rates = engine.refresh_rates().await;
    if !rates.is_success {
        *session.error_counts.entry("rates".to_string()).or_insert(0) += 1;
        warn!("Rate table not ready, skipping cycle {}", session.cycles);
        return Ok(());
    }

    let pools = engine.refresh_pools().await;
    if !pools.is_success {
        *session.error_counts.entry("pools".to_string()).or_insert(0) += 1;
    }

    let collateral = engine.refresh_collateral().await;
    if !collateral.is_success {
        *session.error_counts.entry("collateral".to_string()).or_insert(0) += 1;
    }

    match engine.overview(Utc::now().timestamp_millis()).await {
        Some(overview) => {
            session.overviews_published += 1;
            utils::print_overview(&overview);

            if let Err(e) = storage::save_overview_snapshot(&overview) {
                error!("Failed to save overview snapshot: {}", e);
                *session.error_counts.entry("save_snapshot".to_string()).or_insert(0) += 1;
            } else {
                session.snapshots_saved += 1;
            }
        }
        None => {
            info!("⏳ Overview still loading (cycle {}), waiting for inputs...", session.cycles);
        }
    }

    Ok(())
}

/// Print final statistics on shutdown
fn print_final_statistics(start_time: Instant, session: &SessionState) {
    info!("\n🛑 Shutting down gracefully...");
    info!("Final statistics:");
    info!("   Total runtime: {:?}", start_time.elapsed());
    info!("   Refresh cycles: {}", session.cycles);
    info!("   Overviews published: {}", session.overviews_published);
    info!("   Snapshots saved: {}", session.snapshots_saved);
    info!("   Total errors: {:?}", session.error_counts);
}
