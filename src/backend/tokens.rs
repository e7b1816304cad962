//! Token stats endpoint

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backend::BackendClient;
use crate::errors::StatsResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStats {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub total_supply: Decimal,
}

impl BackendClient {
    /// Current stats for every token the backend tracks.
    pub async fn fetch_token_stats(&self) -> StatsResult<Vec<TokenStats>> {
        let url = self.stats_url("/tokens");
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(
            reqwest::Client::new(),
            base.to_string(),
            base.to_string(),
        )
    }

    #[tokio::test]
    async fn parses_token_stats_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tokens")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"symbol":"BALN","name":"Balance Token","price":0.25,"total_supply":350000000},
                    {"symbol":"bnUSD","name":"Balanced Dollar","price":1.0,"total_supply":4500000}
                ]"#,
            )
            .create_async()
            .await;

        let stats = client(&server.url()).fetch_token_stats().await.unwrap();
        mock.assert_async().await;

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].symbol, "BALN");
        assert_eq!(stats[0].price, dec!(0.25));
    }

    #[tokio::test]
    async fn server_error_surfaces_as_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokens")
            .with_status(500)
            .with_body("boom")
            .expect_at_least(1)
            .create_async()
            .await;

        let result = client(&server.url()).fetch_token_stats().await;
        assert!(result.is_err());
    }
}
