//! Total Value Locked aggregation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{CollateralPosition, PairRecord, RateTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvlBreakdown {
    pub pools_usd: Decimal,
    pub collateral_usd: Decimal,
    pub total_usd: Decimal,
    /// Symbols that had no USD rate and were left out of the sum.
    pub skipped: Vec<String>,
}

/// TVL = Σ(pool liquidity in USD) + Σ(collateral balances in USD).
/// Entries whose symbol has no rate are skipped and reported, never
/// silently valued at zero.
pub fn compute_tvl(
    pools: &[PairRecord],
    collateral: &[CollateralPosition],
    rates: &RateTable,
) -> TvlBreakdown {
    let mut pools_usd = dec!(0);
    let mut collateral_usd = dec!(0);
    let mut skipped = Vec::new();

    for pool in pools {
        match pool.liquidity_usd(rates) {
            Some(usd) => pools_usd += usd,
            None => {
                warn!("⚠️ No rate for pool {}, excluded from TVL", pool.name());
                skipped.push(pool.name());
            }
        }
    }

    for position in collateral {
        match position.usd_value(rates) {
            Some(usd) => collateral_usd += usd,
            None => {
                warn!("⚠️ No rate for collateral {}, excluded from TVL", position.symbol);
                skipped.push(position.symbol.clone());
            }
        }
    }

    TvlBreakdown {
        pools_usd,
        collateral_usd,
        total_usd: pools_usd + collateral_usd,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rates() -> RateTable {
        let mut rates = RateTable::new();
        rates.insert("BALN", dec!(0.25));
        rates.insert("bnUSD", dec!(1));
        rates.insert("sICX", dec!(0.40));
        rates
    }

    fn pool(id: u32, base: &str, quote: &str, base_liq: Decimal, quote_liq: Decimal) -> PairRecord {
        PairRecord {
            pool_id: id,
            base_symbol: base.to_string(),
            quote_symbol: quote.to_string(),
            base_liquidity: base_liq,
            quote_liquidity: quote_liq,
            volume_usd: dec!(0),
            fees_usd: dec!(0),
            apy: None,
        }
    }

    #[test]
    fn tvl_sums_pools_and_collateral() {
        let pools = vec![
            // 1000 * 0.25 + 250 * 1 = 500
            pool(2, "BALN", "bnUSD", dec!(1000), dec!(250)),
            // 500 * 0.40 + 200 * 1 = 400
            pool(3, "sICX", "bnUSD", dec!(500), dec!(200)),
        ];
        let collateral = vec![
            CollateralPosition { symbol: "sICX".to_string(), amount: dec!(1000) }, // 400
        ];

        let tvl = compute_tvl(&pools, &collateral, &rates());

        assert_eq!(tvl.pools_usd, dec!(900));
        assert_eq!(tvl.collateral_usd, dec!(400.0));
        assert_eq!(tvl.total_usd, dec!(1300.0));
        assert!(tvl.skipped.is_empty());
    }

    #[test]
    fn removing_one_entry_reduces_tvl_by_its_usd_value() {
        let pools = vec![
            pool(2, "BALN", "bnUSD", dec!(1000), dec!(250)),
            pool(3, "sICX", "bnUSD", dec!(500), dec!(200)),
        ];
        let collateral = vec![
            CollateralPosition { symbol: "sICX".to_string(), amount: dec!(1000) },
        ];
        let rates = rates();

        let full = compute_tvl(&pools, &collateral, &rates);
        let removed_value = pools[1].liquidity_usd(&rates).unwrap();
        let without = compute_tvl(&pools[..1], &collateral, &rates);

        assert_eq!(full.total_usd - without.total_usd, removed_value);

        let without_collateral = compute_tvl(&pools, &[], &rates);
        assert_eq!(
            full.total_usd - without_collateral.total_usd,
            collateral[0].usd_value(&rates).unwrap()
        );
    }

    #[test]
    fn unknown_symbols_are_skipped_and_reported() {
        let pools = vec![pool(9, "MYSTERY", "bnUSD", dec!(100), dec!(100))];
        let tvl = compute_tvl(&pools, &[], &rates());

        assert_eq!(tvl.total_usd, dec!(0));
        assert_eq!(tvl.skipped, vec!["MYSTERY/bnUSD".to_string()]);
    }
}
