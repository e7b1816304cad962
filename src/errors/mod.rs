//! Error types and containment policy

pub mod stats_error;

pub use stats_error::*;
