//! Typed contract read interfaces over the RPC provider

pub mod contracts;
pub mod multicall;

pub use contracts::*;
pub use multicall::*;
