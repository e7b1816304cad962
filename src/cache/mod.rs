//! Query caching with freshness timestamps and keep-previous-data semantics

pub mod query;

pub use query::*;
