//! Derived metrics: combining raw chain/backend values into user-facing figures

pub mod rates;
pub mod tvl;
pub mod apy;
pub mod earnings;
pub mod burn;
pub mod holdings;
pub mod engine;

pub use rates::*;
pub use tvl::*;
pub use apy::*;
pub use earnings::*;
pub use burn::*;
pub use holdings::*;
pub use engine::*;
