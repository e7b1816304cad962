//! Core data types and structures

pub mod addresses;
pub mod quotes;
pub mod pools;
pub mod metrics;

pub use addresses::*;
pub use quotes::*;
pub use pools::*;
pub use metrics::*;
