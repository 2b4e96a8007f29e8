//! Collaborator trait definitions
//!
//! The pool consumes four external contracts. The swap venue, the price feed
//! and the automation registry are remote calls and therefore async; the
//! index ledger executes in the same transaction as the pool and is sync.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::adapters::errors::CollaboratorResult;
use crate::adapters::types::{IdaShares, PriceData, SwapRequest};

/// Swap venue routing the pool's input balance to the output asset
///
/// # Example Implementation
///
/// ```ignore
/// struct UniswapRouter { /* rpc handle */ }
///
/// #[async_trait]
/// impl SwapRouter for UniswapRouter {
///     async fn swap(&self, request: SwapRequest) -> CollaboratorResult<u128> {
///         // exactInput(path, fees, amount_in, min_amount_out)
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait SwapRouter: Send + Sync {
    /// Swap `request.amount_in` along the path, returning the amount received
    ///
    /// Must fail rather than return less than `request.min_amount_out`.
    async fn swap(&self, request: SwapRequest) -> CollaboratorResult<u128>;
}

/// Reference price source used for the slippage bound
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Latest raw answer; inversion and staleness are applied by the pool
    async fn latest_price(&self) -> CollaboratorResult<PriceData>;
}

/// Automation network that triggers distributions and collects a fee
#[async_trait]
pub trait AutomationRegistry: Send + Sync {
    /// Identity allowed to call `distribute` as the automated executor
    fn executor(&self) -> Address;

    /// Transfer `amount` of `fee_token` to the automation fee sink
    async fn pay_fee(&self, fee_token: Address, amount: u128) -> CollaboratorResult<()>;
}

/// Pro-rata distribution ledger holding units and the cumulative index
///
/// This is the source of truth for `total_units` and the index value.
pub trait IndexLedger: Send + Sync {
    /// Current cumulative output-per-unit
    fn index_value(&self) -> u128;

    /// Sum of all subscribers' units
    fn total_units(&self) -> u128;

    /// Subscription view for one account
    fn subscription(&self, account: Address) -> IdaShares;

    /// Let `account` receive distributions directly instead of as pending
    fn approve_subscription(&mut self, account: Address);

    /// Set `account`'s units, settling what it accrued under the old units
    fn update_subscription_units(&mut self, account: Address, units: u128);

    /// Raise the index to `new_value`, returning the amount handed out
    ///
    /// Rejects any value below the current index.
    fn update_index_value(&mut self, new_value: u128) -> Result<u128, String>;

    /// Output already paid out to `account`
    fn balance_of(&self, account: Address) -> u128;
}
