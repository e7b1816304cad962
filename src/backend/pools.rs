//! Pool stats endpoint

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backend::BackendClient;
use crate::errors::StatsResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub pool_id: u32,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub base_liquidity: Decimal,
    pub quote_liquidity: Decimal,
    pub volume_24h_usd: Decimal,
    pub fees_24h_usd: Decimal,
}

impl BackendClient {
    /// Liquidity, volume and fee statistics for every pool.
    pub async fn fetch_pool_stats(&self) -> StatsResult<Vec<PoolStats>> {
        let url = self.stats_url("/pools");
        self.get_json(&url).await
    }
}
