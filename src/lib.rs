//! Streaming DCA pool
//!
//! Accounts stream an input token into the pool; the pool periodically swaps
//! the accrued balance into an output token and hands the proceeds back
//! pro-rata through a cumulative distribution index:
//! - Trade ledger driven by flow created/updated/terminated events
//! - Atomic distribution cycle with oracle slippage bound and automation fee
//! - Self-adjusting automation fee share and next-distribution predictor

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;

pub use error::{AppError, PoolError};
