//! Reward-based APY calculation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{DAYS_PER_YEAR, LEGACY_POOL_ID};

#[derive(Debug, Clone)]
pub struct ApyInputs {
    pub pool_id: u32,
    /// Reward tokens emitted per day, protocol-wide.
    pub daily_emission: Decimal,
    /// Fraction of the daily emission allocated to this pool's LPs.
    pub allocation_fraction: Decimal,
    pub reward_token_price: Decimal,
    /// Staked LP supply / total LP supply. None while staking data is
    /// unavailable.
    pub staked_ratio: Option<Decimal>,
    pub pool_tvl_usd: Decimal,
}

/// APY = emission × allocation × 365 × price / (staked_ratio × pool TVL).
///
/// The legacy pool reports incomplete staking data, so its ratio is pinned
/// to 1 regardless of what the chain returns. Returns None (rendered as a
/// loading/dash placeholder) when any denominator would be zero or the
/// staked ratio is still unresolved.
pub fn reward_apy(inputs: &ApyInputs) -> Option<Decimal> {
    let staked_ratio = if inputs.pool_id == LEGACY_POOL_ID {
        dec!(1)
    } else {
        inputs.staked_ratio?
    };

    if staked_ratio <= dec!(0) || inputs.pool_tvl_usd <= dec!(0) {
        return None;
    }

    let yearly_rewards_usd = inputs.daily_emission
        * inputs.allocation_fraction
        * DAYS_PER_YEAR
        * inputs.reward_token_price;

    Some(yearly_rewards_usd / (staked_ratio * inputs.pool_tvl_usd))
}
