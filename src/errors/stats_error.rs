//! Custom error types for the aggregator
//!
//! Failures are contained at the query boundary: callers log them, keep any
//! previously cached value, and carry on. Nothing here is fatal to the
//! process except provider setup at startup.

use alloy::primitives::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Contract read failed: {contract} - {message}")]
    Contract {
        contract: Address,
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Backend request failed: {endpoint} - {message}")]
    Backend {
        endpoint: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Unexpected data shape: {context}")]
    DataShape {
        context: String,
    },

    #[error("Unknown token symbol: {symbol}")]
    UnknownToken {
        symbol: String,
    },
}

pub type StatsResult<T> = Result<T, StatsError>;
