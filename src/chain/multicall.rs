//! Multicall aggregation: batching several contract reads into one round trip

use alloy::{
    eips::BlockId,
    primitives::{Address, Bytes, U256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    sol_types::SolValue,
};
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::{
    chain::contracts::calldata,
    errors::{StatsError, StatsResult},
    network::retry::{retry_with_backoff, RetryConfig},
    types::MULTICALL_CONTRACT,
    ConcreteProvider,
};

/// One read in an aggregate batch.
#[derive(Debug, Clone)]
pub struct AggregateCall {
    pub target: Address,
    pub calldata: Bytes,
}

impl AggregateCall {
    pub fn balance_of(token: Address, holder: Address) -> Self {
        Self {
            target: token,
            calldata: calldata("balanceOf(address)", holder.abi_encode()),
        }
    }
}

pub struct MulticallContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl MulticallContract {
    pub fn new(provider: Arc<ConcreteProvider>) -> Self {
        Self { address: MULTICALL_CONTRACT, provider }
    }

    /// Executes all calls in a single `aggregate` round trip, optionally
    /// pinned to a block height. Returns the block the reads were served at
    /// and one raw return blob per call, in call order.
    pub async fn aggregate(
        &self,
        calls: &[AggregateCall],
        at: Option<u64>,
    ) -> StatsResult<(u64, Vec<Bytes>)> {
        let encoded: Vec<(Address, Bytes)> = calls
            .iter()
            .map(|c| (c.target, c.calldata.clone()))
            .collect();
        let data = calldata("aggregate((address,bytes)[])", (encoded,).abi_encode_params());

        let operation = || async {
            let raw = self.raw_call(data.clone(), at).await?;
            let (block, returns) = <(U256, Vec<Bytes>)>::abi_decode_params(&raw, true)
                .context("Failed to decode aggregate return data")?;
            Ok((block.to::<u64>(), returns))
        };

        retry_with_backoff(operation, &RetryConfig::default(), "multicall aggregate")
            .await
            .map_err(|e| match e {
                StatsError::Network { .. } => e,
                _ => StatsError::Contract {
                    contract: self.address,
                    message: "aggregate batch failed".to_string(),
                    source: anyhow::anyhow!("{}", e),
                },
            })
    }

    async fn raw_call(&self, data: Bytes, at: Option<u64>) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .to(self.address)
            .input(data.into());

        let mut call = self.provider.call(&tx);
        if let Some(height) = at {
            call = call.block(BlockId::number(height));
        }
        let result = call.await.context("Multicall aggregate call failed")?;
        Ok(result)
    }
}

/// Decodes a uint256 return blob from an aggregate batch.
pub fn decode_u256(raw: &Bytes) -> StatsResult<U256> {
    U256::abi_decode(raw, true).map_err(|_| StatsError::DataShape {
        context: "aggregate entry is not a uint256".to_string(),
    })
}
