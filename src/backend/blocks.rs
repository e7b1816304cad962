//! Block-by-timestamp lookup endpoint

use serde::{Deserialize, Serialize};

use crate::backend::BackendClient;
use crate::errors::StatsResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockAtTime {
    pub number: u64,
    pub timestamp_ms: i64,
}

impl BackendClient {
    /// The block closest to (at or before) the given millisecond timestamp.
    /// Used to pin historical contract reads for period comparisons.
    pub async fn block_at_timestamp(&self, timestamp_ms: i64) -> StatsResult<BlockAtTime> {
        let url = self.blocks_url(&format!("/blocks/timestamp/{}", timestamp_ms));
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_block_lookup_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/blocks/timestamp/1700000000000")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"number": 73000000, "timestamp_ms": 1699999998000}"#)
            .create_async()
            .await;

        let client = BackendClient::new(
            reqwest::Client::new(),
            server.url(),
            server.url(),
        );
        let block = client.block_at_timestamp(1_700_000_000_000).await.unwrap();

        assert_eq!(block.number, 73_000_000);
        assert!(block.timestamp_ms <= 1_700_000_000_000);
    }
}
