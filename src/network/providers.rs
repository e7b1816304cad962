//! RPC provider and HTTP client setup

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{
    config::Config,
    network::retry::{retry_with_backoff, RetryConfig},
    ConcreteProvider,
};

pub async fn setup_provider(config: &Config) -> Result<Arc<ConcreteProvider>> {
    let provider: Arc<ConcreteProvider> = Arc::new(
        ProviderBuilder::new()
            .on_http(config.rpc_url.parse()?)
            .boxed()
    );

    info!("🔗 Testing connection to RPC node...");
    let block = retry_with_backoff(
        || async {
            provider.get_block_number().await
                .context("Failed to get block number")
        },
        &RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10000,
            exponential_base: 2.0,
        },
        "RPC node connection",
    ).await
    .map_err(|e| anyhow::anyhow!("Network connection failed: {}", e))?;

    info!("✅ Connected to RPC node at block {}", block);
    Ok(provider)
}

pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}
