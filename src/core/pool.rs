//! The DCA pool state machine
//!
//! `DcaPool` owns every piece of mutable pool state: the trade ledger, the
//! index ledger, the automation fee share, the distribution timestamp and
//! the token books. Flow events (`callbacks`) and distributions
//! (`distribution`) are the only operations that mutate it; everything in
//! this file is construction and read-only queries.

use std::collections::VecDeque;
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::Mutex;
use tracing::info;

use crate::adapters::{AutomationRegistry, IdaShares, IndexLedger, PriceFeed, SwapRouter};
use crate::config::{AppConfig, OracleConfig, PoolConfig};
use crate::core::balance::StreamBalance;
use crate::core::distribution::DistributionOutcome;
use crate::core::fee_share::FeeShareController;
use crate::core::oracle::effective_price;
use crate::core::scheduling::{next_distribution_time, GasQuote};
use crate::core::trades::{Trade, TradeLedger};
use crate::core::units::UnitConverter;
use crate::error::{PoolError, PoolResult, Result};

/// Number of distribution outcomes kept for inspection
pub const OUTCOME_HISTORY_LIMIT: usize = 256;

/// Pool shared between the keeper task and flow event producers
pub type SharedPool<L, R, P, A> = Arc<Mutex<DcaPool<L, R, P, A>>>;

/// Streaming DCA pool wired to its four collaborators
pub struct DcaPool<L, R, P, A> {
    pub(crate) config: PoolConfig,
    pub(crate) oracle: OracleConfig,
    pub(crate) trades: TradeLedger,
    pub(crate) ledger: L,
    pub(crate) router: R,
    pub(crate) price_feed: P,
    pub(crate) automation: A,
    pub(crate) fee_controller: FeeShareController,
    pub(crate) fee_share: u32,
    pub(crate) last_distributed_at: u64,
    pub(crate) input: StreamBalance,
    pub(crate) output_balance: u128,
    pub(crate) outcomes: VecDeque<DistributionOutcome>,
}

impl<L, R, P, A> DcaPool<L, R, P, A>
where
    L: IndexLedger,
    R: SwapRouter,
    P: PriceFeed,
    A: AutomationRegistry,
{
    /// Create a pool at `now`
    ///
    /// The configuration is validated first; `now` becomes the initial
    /// `last_distributed_at`.
    pub fn new(
        config: &AppConfig,
        ledger: L,
        router: R,
        price_feed: P,
        automation: A,
        now: u64,
    ) -> Result<Self> {
        config.validate()?;

        info!(
            input_token = %config.pool.input_token,
            output_token = %config.pool.output_token,
            hops = config.pool.swap_path.len(),
            share_scaler = config.pool.share_scaler,
            fee_share = config.fee_share.initial,
            "Pool initialized"
        );

        Ok(Self {
            config: config.pool.clone(),
            oracle: config.oracle.clone(),
            trades: TradeLedger::new(UnitConverter::new(config.pool.share_scaler)),
            ledger,
            router,
            price_feed,
            automation,
            fee_controller: FeeShareController::from_config(&config.fee_share),
            fee_share: config.fee_share.initial,
            last_distributed_at: now,
            input: StreamBalance::new(now),
            output_balance: 0,
            outcomes: VecDeque::new(),
        })
    }

    /// Wrap the pool for sharing across tasks
    pub fn into_shared(self) -> SharedPool<L, R, P, A> {
        Arc::new(Mutex::new(self))
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Let `account` receive distributions directly instead of as pending
    pub fn approve_subscription(&mut self, account: Address) {
        self.ledger.approve_subscription(account);
        info!(account = %account, "Subscription approved");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn automation(&self) -> &A {
        &self.automation
    }

    /// Latest trade, or the all-zero record for an account with no history
    pub fn get_latest_trade(&self, account: Address) -> Trade {
        self.latest_trade(account).unwrap_or_default()
    }

    /// Latest trade, `None` for an account with no history
    pub fn latest_trade(&self, account: Address) -> Option<Trade> {
        self.trades.latest_trade(account).copied()
    }

    pub fn get_trade_count(&self, account: Address) -> usize {
        self.trades.trade_count(account)
    }

    pub fn get_trades(&self, account: Address) -> &[Trade] {
        self.trades.trades(account)
    }

    pub fn has_open_trade(&self, account: Address) -> bool {
        self.trades.has_open_trade(account)
    }

    pub fn get_ida_shares(&self, account: Address) -> IdaShares {
        self.ledger.subscription(account)
    }

    pub fn get_ida_index_value(&self) -> u128 {
        self.ledger.index_value()
    }

    pub fn last_distributed_at(&self) -> u64 {
        self.last_distributed_at
    }

    pub fn gelato_fee_share(&self) -> u32 {
        self.fee_share
    }

    /// Sum of every open trade's flow rate
    pub fn net_flow_rate(&self) -> i128 {
        self.input.net_flow_rate()
    }

    /// Input tokens accrued and not yet swapped
    pub fn input_balance(&self, now: u64) -> u128 {
        self.input.balance_at(now)
    }

    /// Output tokens held back by the pool (rounding residual, unallocated output)
    pub fn output_balance(&self) -> u128 {
        self.output_balance
    }

    /// Recent distribution outcomes, oldest first
    pub fn outcomes(&self) -> impl Iterator<Item = &DistributionOutcome> {
        self.outcomes.iter()
    }

    /// Feed price as input-per-output in feed decimals
    ///
    /// # Errors
    /// `PoolError::Oracle` if the feed is unreachable or answers a
    /// non-positive price.
    pub async fn get_latest_price(&self) -> PoolResult<u128> {
        let data = self
            .price_feed
            .latest_price()
            .await
            .map_err(|e| PoolError::Oracle(e.to_string()))?;
        let price = u128::try_from(data.price)
            .ok()
            .filter(|price| *price > 0)
            .ok_or_else(|| PoolError::Oracle(format!("non-positive price {}", data.price)))?;
        effective_price(price, self.oracle.price_decimals, self.config.invert_price)
            .ok_or_else(|| PoolError::Oracle("price inversion overflows".to_string()))
    }

    /// When the next distribution pays for its own gas; `None` means never
    pub fn get_next_distribution_time(&self, quote: GasQuote) -> Option<u64> {
        next_distribution_time(self.last_distributed_at, self.net_flow_rate(), quote)
    }
}
