//! Snapshot persistence

pub mod snapshots;

pub use snapshots::*;
