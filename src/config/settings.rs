//! Aggregator configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Refresh cadence bounds
pub const MIN_REFRESH_SECS: u64 = 5;
pub const MAX_REFRESH_SECS: u64 = 3600;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

// Period comparison bounds
pub const MIN_COMPARISON_DAYS: i64 = 1;
pub const MAX_COMPARISON_DAYS: i64 = 90;

// Cache freshness defaults (seconds)
pub const RATES_TTL_SECS: u64 = 60;
pub const POOLS_TTL_SECS: u64 = 120;
pub const BLOCK_LOOKUP_TTL_SECS: u64 = 600;
// Burn-counter readings at past bucket boundaries are pinned to immutable
// block heights; a long TTL avoids re-reading them every cycle.
pub const BURN_READING_TTL_SECS: u64 = 6 * 60 * 60;

// Protocol constants. These encode protocol-specific behavior that cannot
// be derived from chain data; they are configuration, not inferred rules.
//
// The original pool (id 1) reports incomplete staking data, so its APY is
// always computed with a staked ratio of 1.
pub const LEGACY_POOL_ID: u32 = 1;
/// Fixed epoch the weekly burn schedule starts at (2023-01-02 00:00 UTC).
pub const BURN_TRACKING_EPOCH_MS: i64 = 1_672_617_600_000;
pub const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const DAYS_PER_YEAR: Decimal = dec!(365);
/// Fraction of the daily emission routed to LP incentives.
pub const DEFAULT_LP_ALLOCATION: Decimal = dec!(0.1);

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub stats_api_url: String,
    pub blocks_api_url: String,
    pub refresh_interval_secs: u64,
    pub comparison_days: i64,
    pub lp_allocation: Decimal,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".to_string()),
            stats_api_url: env::var("STATS_API_URL")
                .unwrap_or_else(|_| "https://balanced.icon.community/api/v1".to_string()),
            blocks_api_url: env::var("BLOCKS_API_URL")
                .unwrap_or_else(|_| "https://tracker.icon.community/api/v1".to_string()),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_SECS)
                .max(MIN_REFRESH_SECS)
                .min(MAX_REFRESH_SECS),
            comparison_days: env::var("COMPARISON_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1)
                .max(MIN_COMPARISON_DAYS)
                .min(MAX_COMPARISON_DAYS),
            lp_allocation: env::var("LP_ALLOCATION")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .filter(|a| *a > dec!(0) && *a <= dec!(1))
                .unwrap_or(DEFAULT_LP_ALLOCATION),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10)
                .max(1)
                .min(60),
        }
    }
}
