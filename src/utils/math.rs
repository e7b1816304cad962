//! Mathematical utility functions

use alloy::primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::errors::{StatsError, StatsResult};

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

/// Converts a raw on-chain integer into a token amount with the token's
/// decimals applied. Fails on values too large for decimal math rather
/// than silently truncating.
pub fn scale_u256(raw: U256, decimals: i32) -> StatsResult<Decimal> {
    let value = Decimal::from_str(&raw.to_string()).map_err(|_| StatsError::DataShape {
        context: format!("on-chain value {} exceeds decimal range", raw),
    })?;
    Ok(value / pow10(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_token_decimals() {
        let wei = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(scale_u256(wei, 18).unwrap(), dec!(1.5));

        let usdc = U256::from(2_500_000u64);
        assert_eq!(scale_u256(usdc, 6).unwrap(), dec!(2.5));
    }

    #[test]
    fn oversized_values_error_instead_of_truncating() {
        assert!(scale_u256(U256::MAX, 18).is_err());
    }
}
