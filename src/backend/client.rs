//! Shared HTTP client for the analytics backends

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    errors::{StatsError, StatsResult},
    network::retry::{retry_with_backoff, RetryConfig},
};

/// Client for the independently-versioned REST analytics APIs. All
/// endpoints are read-only GETs with query-string parameters.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    stats_base: String,
    blocks_base: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, stats_base: String, blocks_base: String) -> Self {
        Self {
            http,
            stats_base: stats_base.trim_end_matches('/').to_string(),
            blocks_base: blocks_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn stats_url(&self, path: &str) -> String {
        format!("{}{}", self.stats_base, path)
    }

    pub fn blocks_url(&self, path: &str) -> String {
        format!("{}{}", self.blocks_base, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> StatsResult<T> {
        let operation = || async {
            let response = self.http
                .get(url)
                .send()
                .await
                .context("HTTP request failed")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("⚠️ Backend returned error status {}: {}", status, body);
                return Err(anyhow::anyhow!("Backend error: {} - {}", status, body));
            }

            let parsed: T = response.json().await
                .context("Failed to parse JSON response")?;
            Ok(parsed)
        };

        retry_with_backoff(operation, &RetryConfig::default(), url)
            .await
            .map_err(|e| StatsError::Backend {
                endpoint: url.to_string(),
                message: "request failed".to_string(),
                source: Some(anyhow::anyhow!("{}", e)),
            })
    }
}
