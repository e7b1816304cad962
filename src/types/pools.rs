//! Liquidity pool and collateral vault records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RateTable;

/// Per-pool aggregate of chain balances and backend statistics.
/// Recomputed on every refresh cycle, never persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRecord {
    pub pool_id: u32,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub base_liquidity: Decimal,
    pub quote_liquidity: Decimal,
    pub volume_usd: Decimal,
    pub fees_usd: Decimal,
    pub apy: Option<Decimal>,
}

impl PairRecord {
    pub fn name(&self) -> String {
        format!("{}/{}", self.base_symbol, self.quote_symbol)
    }

    /// USD liquidity of both sides, or None while either rate is missing.
    pub fn liquidity_usd(&self, rates: &RateTable) -> Option<Decimal> {
        let base = rates.usd_value(&self.base_symbol, self.base_liquidity)?;
        let quote = rates.usd_value(&self.quote_symbol, self.quote_liquidity)?;
        Some(base + quote)
    }
}

/// A collateral-vault balance held against loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralPosition {
    pub symbol: String,
    pub amount: Decimal,
}

impl CollateralPosition {
    pub fn usd_value(&self, rates: &RateTable) -> Option<Decimal> {
        rates.usd_value(&self.symbol, self.amount)
    }
}
