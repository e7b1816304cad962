//! Dividend/fee totals endpoint: historical per-contract fee balances

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backend::BackendClient;
use crate::errors::StatsResult;

/// Raw accrued-fee balance of one fee contract at a block height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractFees {
    pub contract: String,
    pub token_symbol: String,
    pub amount: Decimal,
}

impl BackendClient {
    /// Accrued fee totals for every fee contract, pinned to a block height.
    /// A contract deployed after that height is simply absent from the list.
    pub async fn fetch_fee_totals(&self, height: u64) -> StatsResult<Vec<ContractFees>> {
        let url = self.stats_url(&format!("/dividends/fees?height={}", height));
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn parses_fee_totals_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/dividends/fees?height=73000000")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"contract":"loans","token_symbol":"bnUSD","amount":100},
                    {"contract":"swaps","token_symbol":"BALN","amount":42.5}
                ]"#,
            )
            .create_async()
            .await;

        let client = BackendClient::new(
            reqwest::Client::new(),
            server.url(),
            server.url(),
        );
        let fees = client.fetch_fee_totals(73_000_000).await.unwrap();

        assert_eq!(fees.len(), 2);
        assert_eq!(fees[1].amount, dec!(42.5));
    }
}
