//! Application-wide error types using thiserror
//!
//! `PoolError` is the taxonomy of the accounting core; `AppError` wraps it
//! together with configuration and I/O failures for the binary and loaders.

use alloy_primitives::Address;
use thiserror::Error;

use crate::adapters::errors::CollaboratorError;

/// Errors raised by the pool state machine
///
/// Every distribution-path error leaves the pool exactly as it was before the
/// call. Callback-path errors reject the originating flow operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A flow was opened on a token other than the configured input token
    #[error("Unsupported token {token}: pool only accepts {expected}")]
    UnsupportedToken { token: Address, expected: Address },

    /// A flow was opened or updated with a rate that streams nothing
    #[error("Account {account} sent non-positive flow rate {flow_rate}")]
    InvalidFlowRate { account: Address, flow_rate: i128 },

    /// Logic bug: an account already holds an open trade
    #[error("Account {0} already has an open trade")]
    AlreadyOpen(Address),

    /// Logic bug: an account has no open trade to close
    #[error("Account {0} has no open trade")]
    NoOpenTrade(Address),

    /// Stale, non-positive, or unreachable oracle price
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Swap venue rejected the trade
    #[error("Swap failed: {0}")]
    SwapFailed(CollaboratorError),

    /// Automation fee could not be paid
    #[error("Fee payment failed: {0}")]
    FeePayment(CollaboratorError),

    /// Index ledger rejected a write
    #[error("Index ledger error: {0}")]
    Ledger(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for pool operations
pub type PoolResult<T> = std::result::Result<T, PoolError>;
