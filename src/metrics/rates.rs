//! Rate table construction from backend token stats

use rust_decimal_macros::dec;
use tracing::warn;

use crate::backend::TokenStats;
use crate::types::RateTable;

/// Builds the symbol → USD price table. Tokens reporting a non-positive
/// price are left out so downstream metrics treat them as unavailable
/// rather than valuing balances at zero.
pub fn build_rate_table(stats: &[TokenStats]) -> RateTable {
    let mut rates = RateTable::new();
    for token in stats {
        if token.price <= dec!(0) {
            warn!("⚠️ Skipping token {} with non-positive price {}", token.symbol, token.price);
            continue;
        }
        rates.insert(token.symbol.clone(), token.price);
    }
    rates
}
