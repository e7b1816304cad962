//! Protocol contract addresses and tracked token registry

use alloy::primitives::{Address, address};
use lazy_static::lazy_static;
use std::collections::HashMap;

// Core protocol contracts
pub const LOANS_CONTRACT: Address = address!("8f3cf7ad23cd3cadbd9735aff958023239c6a063");
pub const DEX_CONTRACT: Address = address!("2791bca1f2de4661ed88a30c99a7a9449aa84174");
pub const REWARDS_CONTRACT: Address = address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270");
pub const DAO_FUND_CONTRACT: Address = address!("1bfd67037b42cf73acf2047067bd4f2c47d9bfd6");
pub const STAKED_LP_CONTRACT: Address = address!("53e0bca35ec356bd5dddfebbd1fc0fd03fabad39");

// Token contracts
pub const BALN_TOKEN: Address = address!("9a71012b13ca4d3d0cdc72a177df3ef03b0e76a3");
pub const BNUSD_TOKEN: Address = address!("c2132d05d31c914a87c6611c10748aeb04b58e8f");
pub const SICX_TOKEN: Address = address!("0a3bb08b3a15a19b4de82f8acfc862606fb69a2d");
pub const USDC_TOKEN: Address = address!("2ef9a417ecba3ec5e193ba6e34a8b4f30be8df6c");

// Multicall aggregator
pub const MULTICALL_CONTRACT: Address = address!("ca11bde05977b3631167028862be2a173976ca11");

/// A token the aggregator tracks balances and prices for.
#[derive(Debug, Clone)]
pub struct TrackedToken {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: i32,
}

pub const TRACKED_TOKENS: &[TrackedToken] = &[
    TrackedToken { symbol: "BALN", address: BALN_TOKEN, decimals: 18 },
    TrackedToken { symbol: "bnUSD", address: BNUSD_TOKEN, decimals: 18 },
    TrackedToken { symbol: "sICX", address: SICX_TOKEN, decimals: 18 },
    TrackedToken { symbol: "USDC", address: USDC_TOKEN, decimals: 6 },
];

lazy_static! {
    /// Lowercased symbol → registry entry, so ticker lookups are
    /// case-insensitive ("baln" and "BALN" resolve alike).
    pub static ref TOKENS_BY_SYMBOL: HashMap<String, &'static TrackedToken> =
        TRACKED_TOKENS
            .iter()
            .map(|t| (t.symbol.to_ascii_lowercase(), t))
            .collect();
}

pub fn token_by_symbol(symbol: &str) -> Option<&'static TrackedToken> {
    TOKENS_BY_SYMBOL.get(&symbol.to_ascii_lowercase()).copied()
}
