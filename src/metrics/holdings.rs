//! DAO treasury holdings valuation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::metrics::percent_change;
use crate::types::{HoldingEntry, HoldingsSnapshot, RateTable};

/// Values per-token treasury balances against the rate table. Tokens
/// without a rate keep their raw amount but contribute nothing to the
/// total. `prior_total` is the same figure at the start of the comparison
/// window; zero or absent renders the change as "-".
pub fn holdings_snapshot(
    timestamp: DateTime<Utc>,
    amounts: &[(String, Decimal)],
    rates: &RateTable,
    prior_total: Option<Decimal>,
) -> HoldingsSnapshot {
    let mut total_usd = dec!(0);
    let entries: Vec<HoldingEntry> = amounts
        .iter()
        .map(|(symbol, amount)| {
            let value_usd = rates.usd_value(symbol, *amount);
            match value_usd {
                Some(usd) => total_usd += usd,
                None => warn!("⚠️ No rate for holding {}, excluded from total", symbol),
            }
            HoldingEntry {
                symbol: symbol.clone(),
                amount: *amount,
                value_usd,
            }
        })
        .collect();

    HoldingsSnapshot {
        timestamp,
        entries,
        total_usd,
        change_vs_prior: percent_change(prior_total, total_usd),
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
        rates
    }

    #[test]
    fn totals_only_rated_tokens() {
        let amounts = vec![
            ("BALN".to_string(), dec!(4000)),   // 1000
            ("bnUSD".to_string(), dec!(500)),   // 500
            ("MYSTERY".to_string(), dec!(99)),  // no rate
        ];

        let snapshot = holdings_snapshot(Utc::now(), &amounts, &rates(), Some(dec!(1200)));

        assert_eq!(snapshot.total_usd, dec!(1500));
        assert_eq!(snapshot.entries[2].value_usd, None);
        assert_eq!(snapshot.change_vs_prior, Some(dec!(0.25)));
    }

    #[test]
    fn zero_prior_total_gives_no_change_figure() {
        let amounts = vec![("bnUSD".to_string(), dec!(500))];
        let snapshot = holdings_snapshot(Utc::now(), &amounts, &rates(), Some(dec!(0)));
        assert_eq!(snapshot.change_vs_prior, None);
    }
}
