//! REST analytics backend clients (read-only GET endpoints)

pub mod client;
pub mod tokens;
pub mod pools;
pub mod blocks;
pub mod dividends;

pub use client::*;
pub use tokens::*;
pub use pools::*;
pub use blocks::*;
pub use dividends::*;
