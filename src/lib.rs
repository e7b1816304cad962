//! Balanced Stats - Read-only analytics aggregator for the Balanced protocol
//!
//! Polls a blockchain RPC node and REST analytics backends, combines the raw
//! values into derived figures (TVL, APY, income statements, DAO holdings,
//! weekly burn buckets) and reports them as a periodic dashboard with JSONL
//! snapshots.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod chain;
pub mod backend;
pub mod cache;
pub mod metrics;
pub mod utils;
pub mod storage;

// Re-export commonly used items
pub use config::Config;
pub use errors::{StatsError, StatsResult};
pub use types::*;

// Type alias for our concrete provider
pub type ConcreteProvider = alloy::providers::RootProvider<alloy::transports::BoxTransport>;
