//! Derived metric result types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::PairRecord;

/// One reconciled fee-accruing contract in the income statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeIncomeLine {
    pub contract: String,
    pub token_symbol: String,
    /// None when the contract had no balance at the start height,
    /// in which case the full end value counts as new income.
    pub start_amount: Option<Decimal>,
    pub end_amount: Decimal,
    pub income_tokens: Decimal,
    pub income_usd: Decimal,
}

/// Period-over-period protocol income figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub lines: Vec<FeeIncomeLine>,
    pub total_income_usd: Decimal,
    /// vs the preceding window of equal length; None renders as "-".
    pub change_vs_prior: Option<Decimal>,
}

/// One 7-day bucket of the burn schedule. The final bucket covers less
/// than a full week and is flagged pending until the week closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnBucket {
    pub start_ms: i64,
    pub end_ms: i64,
    pub burned: Option<Decimal>,
    pub pending: bool,
}

/// DAO treasury balance for a single tracked token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingEntry {
    pub symbol: String,
    pub amount: Decimal,
    pub value_usd: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<HoldingEntry>,
    pub total_usd: Decimal,
    pub change_vs_prior: Option<Decimal>,
}

/// Top-level figures assembled once every input query has resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolOverview {
    pub timestamp: DateTime<Utc>,
    pub tvl_usd: Decimal,
    pub pools_tvl_usd: Decimal,
    pub collateral_usd: Decimal,
    pub pools: Vec<PairRecord>,
    pub income: Option<IncomeStatement>,
    pub holdings: Option<HoldingsSnapshot>,
    pub weekly_burns: Vec<BurnBucket>,
}
