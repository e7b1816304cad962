//! Configuration management for the stats aggregator
//!
//! `Config` is constructed explicitly at the composition root and passed
//! by reference; there is no global config singleton.

pub mod settings;

pub use settings::*;
