//! Raw observations and comparison windows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single observation of a metric at a point in time. Immutable once
/// fetched; a refetch supersedes it with a new point rather than mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuotePoint {
    pub timestamp_ms: i64,
    pub value: Decimal,
}

impl RawQuotePoint {
    pub fn new(timestamp_ms: i64, value: Decimal) -> Self {
        Self { timestamp_ms, value }
    }
}

/// A comparison interval derived from a user-selected duration,
/// e.g. "the past 7 days" vs the 7 days before that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl PeriodWindow {
    pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    /// Window ending now and starting `days` days earlier.
    pub fn from_days_back(now_ms: i64, days: i64) -> Self {
        Self {
            start_ms: now_ms - days * Self::DAY_MS,
            end_ms: now_ms,
        }
    }

    /// The window of equal length immediately preceding this one.
    pub fn preceding(&self) -> Self {
        let span = self.end_ms - self.start_ms;
        Self {
            start_ms: self.start_ms - span,
            end_ms: self.start_ms,
        }
    }

    pub fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Token symbol → USD price, refreshed periodically. Nearly every derived
/// metric goes through this table to convert token amounts into USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, usd_price: Decimal) {
        self.rates.insert(symbol.into(), usd_price);
    }

    pub fn rate(&self, symbol: &str) -> Option<Decimal> {
        self.rates.get(symbol).copied()
    }

    /// USD value of `amount` tokens, or None when the symbol has no rate.
    pub fn usd_value(&self, symbol: &str, amount: Decimal) -> Option<Decimal> {
        self.rate(symbol).map(|r| r * amount)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn preceding_window_is_adjacent_and_equal_length() {
        let now = 1_700_000_000_000;
        let window = PeriodWindow::from_days_back(now, 7);
        let prior = window.preceding();

        assert_eq!(prior.end_ms, window.start_ms);
        assert_eq!(prior.span_ms(), window.span_ms());
        assert_eq!(window.span_ms(), 7 * PeriodWindow::DAY_MS);
    }

    #[test]
    fn usd_value_requires_a_known_rate() {
        let mut rates = RateTable::new();
        rates.insert("BALN", dec!(0.25));

        assert_eq!(rates.usd_value("BALN", dec!(100)), Some(dec!(25.00)));
        assert_eq!(rates.usd_value("UNKNOWN", dec!(100)), None);
    }
}
