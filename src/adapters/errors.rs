//! Collaborator error types
//!
//! Every failure reported by an external collaborator (swap venue, price
//! feed, automation registry) is wrapped in `CollaboratorError` so the pool
//! can propagate it verbatim inside its own error taxonomy.

use thiserror::Error;

/// Errors surfaced by external collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator reverted the call with a reason string
    #[error("Reverted: {0}")]
    Reverted(String),

    /// The swap venue could not deliver the requested minimum output
    #[error("Slippage exceeded: got {amount_out}, required {min_amount_out}")]
    SlippageExceeded { amount_out: u128, min_amount_out: u128 },

    /// A token transfer could not complete
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// The collaborator is unreachable or not configured
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for collaborator calls
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;
