//! Typed per-contract read methods
//!
//! Every contract the aggregator reads gets an explicit interface with typed
//! methods; there is no stringly-typed method dispatch. Reads may be pinned
//! to a historical block height to observe past state.

use alloy::{
    eips::BlockId,
    primitives::{keccak256, Address, Bytes, U256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    sol_types::SolValue,
};
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::{
    errors::{StatsError, StatsResult},
    network::retry::{retry_with_backoff, RetryConfig},
    ConcreteProvider,
};

/// Builds calldata from a function signature and pre-encoded arguments.
pub(crate) fn calldata(signature: &str, args: Vec<u8>) -> Bytes {
    let mut data = keccak256(signature)[..4].to_vec();
    data.extend(args);
    data.into()
}

async fn read_contract(
    provider: &ConcreteProvider,
    contract: Address,
    data: Bytes,
    at: Option<u64>,
) -> Result<Bytes> {
    let tx = TransactionRequest::default()
        .to(contract)
        .input(data.into());

    let mut call = provider.call(&tx);
    if let Some(height) = at {
        call = call.block(BlockId::number(height));
    }
    let result = call.await.context("Contract call failed")?;
    Ok(result)
}

async fn read_u256(
    provider: &ConcreteProvider,
    contract: Address,
    data: Bytes,
    at: Option<u64>,
    context: &str,
) -> StatsResult<U256> {
    let operation = || async {
        let raw = read_contract(provider, contract, data.clone(), at).await?;
        let value = U256::abi_decode(&raw, true)
            .context("Failed to decode uint256 return value")?;
        Ok(value)
    };

    retry_with_backoff(operation, &RetryConfig::default(), context)
        .await
        .map_err(|e| match e {
            StatsError::Network { .. } => e,
            _ => StatsError::Contract {
                contract,
                message: context.to_string(),
                source: anyhow::anyhow!("{}", e),
            },
        })
}

/// A token contract: the burned-total counter. Holder balances are read in
/// batch through the multicall contract instead of one call per token.
pub struct TokenContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl TokenContract {
    pub fn new(address: Address, provider: Arc<ConcreteProvider>) -> Self {
        Self { address, provider }
    }

    /// Monotonically increasing counter of tokens burned since deployment.
    pub async fn burned_total(&self, at: Option<u64>) -> StatsResult<U256> {
        let data = calldata("totalBurned()", vec![]);
        read_u256(&self.provider, self.address, data, at, "totalBurned").await
    }
}

/// The rewards contract: emission schedule reads.
pub struct RewardsContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl RewardsContract {
    pub fn new(address: Address, provider: Arc<ConcreteProvider>) -> Self {
        Self { address, provider }
    }

    /// Tokens emitted per day across all reward recipients.
    pub async fn daily_emission(&self) -> StatsResult<U256> {
        let data = calldata("getEmission()", vec![]);
        read_u256(&self.provider, self.address, data, None, "getEmission").await
    }
}

/// The DEX contract: per-pool LP supply reads.
pub struct DexContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl DexContract {
    pub fn new(address: Address, provider: Arc<ConcreteProvider>) -> Self {
        Self { address, provider }
    }

    pub async fn lp_supply(&self, pool_id: u32) -> StatsResult<U256> {
        let args = U256::from(pool_id).abi_encode();
        let data = calldata("totalSupply(uint256)", args);
        read_u256(&self.provider, self.address, data, None, "totalSupply(pool)").await
    }
}

/// The staked-LP contract used to derive per-pool staked ratios.
pub struct StakedLpContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl StakedLpContract {
    pub fn new(address: Address, provider: Arc<ConcreteProvider>) -> Self {
        Self { address, provider }
    }

    pub async fn total_staked(&self, pool_id: u32) -> StatsResult<U256> {
        let args = U256::from(pool_id).abi_encode();
        let data = calldata("totalStaked(uint256)", args);
        read_u256(&self.provider, self.address, data, None, "totalStaked").await
    }
}

/// The loans contract: collateral vault balances per token.
pub struct LoansContract {
    pub address: Address,
    provider: Arc<ConcreteProvider>,
}

impl LoansContract {
    pub fn new(address: Address, provider: Arc<ConcreteProvider>) -> Self {
        Self { address, provider }
    }

    pub async fn collateral_total(&self, token: Address, at: Option<u64>) -> StatsResult<U256> {
        let args = token.abi_encode();
        let data = calldata("getTotalCollateral(address)", args);
        read_u256(&self.provider, self.address, data, at, "getTotalCollateral").await
    }
}
