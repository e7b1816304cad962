//! Period-over-period earnings: percentage change and fee-income reconciliation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::warn;

use crate::backend::ContractFees;
use crate::types::{FeeIncomeLine, RateTable};

/// Fractional change `current / past − 1`. None when the past figure is
/// zero or absent — consumers render "-" instead of Infinity/NaN.
pub fn percent_change(past: Option<Decimal>, current: Decimal) -> Option<Decimal> {
    let past = past?;
    if past == dec!(0) {
        return None;
    }
    Some(current / past - dec!(1))
}

/// Reconciles per-contract accrued fee balances between two block heights
/// into income lines. A contract with no balance at the start height is
/// treated as fully new income, not a delta.
pub fn reconcile_fee_income(
    start: &[ContractFees],
    end: &[ContractFees],
    rates: &RateTable,
) -> Vec<FeeIncomeLine> {
    let start_by_key: HashMap<(&str, &str), Decimal> = start
        .iter()
        .map(|f| ((f.contract.as_str(), f.token_symbol.as_str()), f.amount))
        .collect();

    end.iter()
        .map(|fees| {
            let start_amount = start_by_key
                .get(&(fees.contract.as_str(), fees.token_symbol.as_str()))
                .copied();
            let income_tokens = match start_amount {
                Some(prior) => fees.amount - prior,
                None => fees.amount,
            };
            let income_usd = rates
                .usd_value(&fees.token_symbol, income_tokens)
                .unwrap_or_else(|| {
                    warn!("⚠️ No rate for fee token {}, income valued at $0", fees.token_symbol);
                    dec!(0)
                });

            FeeIncomeLine {
                contract: fees.contract.clone(),
                token_symbol: fees.token_symbol.clone(),
                start_amount,
                end_amount: fees.amount,
                income_tokens,
                income_usd,
            }
        })
        .collect()
}

pub fn total_income_usd(lines: &[FeeIncomeLine]) -> Decimal {
    lines.iter().map(|l| l.income_usd).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fees(contract: &str, token: &str, amount: Decimal) -> ContractFees {
        ContractFees {
            contract: contract.to_string(),
            token_symbol: token.to_string(),
            amount,
        }
    }

    fn rates() -> RateTable {
        let mut rates = RateTable::new();
        rates.insert("bnUSD", dec!(1));
        rates.insert("BALN", dec!(0.5));
        rates
    }

    #[test]
    fn change_is_none_for_zero_or_absent_past() {
        assert_eq!(percent_change(None, dec!(100)), None);
        assert_eq!(percent_change(Some(dec!(0)), dec!(100)), None);
    }

    #[test]
    fn change_is_fractional_growth() {
        assert_eq!(percent_change(Some(dec!(100)), dec!(150)), Some(dec!(0.5)));
        assert_eq!(percent_change(Some(dec!(200)), dec!(150)), Some(dec!(-0.25)));
    }

    #[test]
    fn loan_fee_delta_matches_worked_example() {
        let start = vec![fees("loans", "bnUSD", dec!(100))];
        let end = vec![fees("loans", "bnUSD", dec!(150))];

        let lines = reconcile_fee_income(&start, &end, &rates());

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].income_tokens, dec!(50));
        assert_eq!(lines[0].income_usd, dec!(50));
    }

    #[test]
    fn contract_absent_at_start_counts_as_all_new_income() {
        let start = vec![];
        let end = vec![fees("loans", "bnUSD", dec!(150))];

        let lines = reconcile_fee_income(&start, &end, &rates());

        assert_eq!(lines[0].start_amount, None);
        assert_eq!(lines[0].income_tokens, dec!(150));
        assert_eq!(lines[0].income_usd, dec!(150));
    }

    #[test]
    fn income_is_converted_through_the_rate_table() {
        let start = vec![fees("swaps", "BALN", dec!(1000))];
        let end = vec![fees("swaps", "BALN", dec!(1400))];

        let lines = reconcile_fee_income(&start, &end, &rates());

        assert_eq!(lines[0].income_tokens, dec!(400));
        assert_eq!(lines[0].income_usd, dec!(200.0));
        assert_eq!(total_income_usd(&lines), dec!(200.0));
    }
}
