//! Flow callback routing
//!
//! The flow ledger notifies the pool when an account starts, changes or stops
//! streaming into it. Every notification is routed through
//! [`DcaPool::on_flow_event`], which rejects foreign tokens and non-positive
//! rates before touching any state.

use alloy_primitives::Address;
use tracing::{debug, warn};

use crate::adapters::{AutomationRegistry, IndexLedger, PriceFeed, SwapRouter};
use crate::core::distribution::DistributeRequest;
use crate::core::events::{log_event, PoolEvent};
use crate::core::pool::DcaPool;
use crate::core::trades::Trade;
use crate::error::{PoolError, PoolResult};

/// Flow lifecycle notification from the flow ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    Created {
        account: Address,
        token: Address,
        flow_rate: i128,
    },
    Updated {
        account: Address,
        token: Address,
        flow_rate: i128,
    },
    Terminated {
        account: Address,
        token: Address,
    },
}

impl FlowEvent {
    pub fn account(&self) -> Address {
        match self {
            FlowEvent::Created { account, .. }
            | FlowEvent::Updated { account, .. }
            | FlowEvent::Terminated { account, .. } => *account,
        }
    }

    pub fn token(&self) -> Address {
        match self {
            FlowEvent::Created { token, .. }
            | FlowEvent::Updated { token, .. }
            | FlowEvent::Terminated { token, .. } => *token,
        }
    }
}

impl<L, R, P, A> DcaPool<L, R, P, A>
where
    L: IndexLedger,
    R: SwapRouter,
    P: PriceFeed,
    A: AutomationRegistry,
{
    /// Apply one flow notification at `now`
    ///
    /// Created and updated flows first distribute whatever input has accrued,
    /// so the new trade starts at the post-distribution index and never
    /// shares in input streamed before it. A terminated flow gets its input
    /// since the last distribution refunded instead of swapped.
    ///
    /// Returns the trade that was opened (created, updated) or closed
    /// (terminated). Any error leaves the pool unchanged, and the flow ledger
    /// must reject the originating flow operation.
    ///
    /// # Errors
    /// - `PoolError::UnsupportedToken` for any token but the input token
    /// - `PoolError::InvalidFlowRate` for a created or updated rate <= 0
    /// - `PoolError::AlreadyOpen` / `PoolError::NoOpenTrade` when the
    ///   notification does not match the account's trade state
    /// - any `distribute` error from the settling distribution
    pub async fn on_flow_event(&mut self, event: FlowEvent, now: u64) -> PoolResult<Trade> {
        let token = event.token();
        if token != self.config.input_token {
            warn!(
                account = %event.account(),
                token = %token,
                "[TRADE] Rejected flow on unsupported token"
            );
            return Err(PoolError::UnsupportedToken {
                token,
                expected: self.config.input_token,
            });
        }

        match event {
            FlowEvent::Created {
                account,
                flow_rate,
                ..
            } => {
                check_flow_rate(account, flow_rate)?;
                if self.trades.has_open_trade(account) {
                    return Err(PoolError::AlreadyOpen(account));
                }
                self.settle_accrued(account, now).await?;

                let index = self.ledger.index_value();
                let opened =
                    self.trades
                        .open_trade(&mut self.ledger, account, flow_rate, now, index)?;
                self.input.apply_flow_delta(now, flow_rate);
                Ok(opened)
            }
            FlowEvent::Updated {
                account,
                flow_rate,
                ..
            } => {
                check_flow_rate(account, flow_rate)?;
                // Checked up front so the close below cannot strand the account
                if !self.trades.has_open_trade(account) {
                    return Err(PoolError::NoOpenTrade(account));
                }
                self.settle_accrued(account, now).await?;

                let index = self.ledger.index_value();
                let closed = self.trades.close_trade(account, now, index)?;
                let opened =
                    self.trades
                        .open_trade(&mut self.ledger, account, flow_rate, now, index)?;
                self.input
                    .apply_flow_delta(now, flow_rate.saturating_sub(closed.flow_rate));
                debug!(
                    account = %account,
                    old_rate = %closed.flow_rate,
                    new_rate = %flow_rate,
                    "[TRADE] Flow updated"
                );
                Ok(opened)
            }
            FlowEvent::Terminated { account, .. } => {
                let open = self
                    .trades
                    .open_trade_of(account)
                    .copied()
                    .ok_or(PoolError::NoOpenTrade(account))?;
                let refund = self.uninvested_input(&open, now);

                let index = self.ledger.index_value();
                let closed = self.trades.close_trade(account, now, index)?;
                self.ledger.update_subscription_units(account, 0);
                log_event(&PoolEvent::units_updated(account, 0, now));
                self.input.apply_flow_delta(now, closed.flow_rate.saturating_neg());

                if refund == 0 {
                    return Ok(closed);
                }
                self.input.debit(now, refund);
                log_event(&PoolEvent::input_refunded(account, refund, now));
                Ok(self.trades.record_refund(account, refund).unwrap_or(closed))
            }
        }
    }

    /// Distribute accrued input before a flow change, as a manual call
    /// without the oracle bound
    async fn settle_accrued(&mut self, account: Address, now: u64) -> PoolResult<()> {
        let accrued = self.input.balance_at(now);
        if accrued == 0 {
            return Ok(());
        }

        debug!(account = %account, accrued = %accrued, "[TRADE] Settling accrued input");
        self.distribute(DistributeRequest::manual(account, false), now)
            .await?;
        Ok(())
    }

    /// Input `trade` streamed since the later of its start and the last
    /// distribution, capped at what the pool holds
    fn uninvested_input(&self, trade: &Trade, now: u64) -> u128 {
        let since = self.last_distributed_at.max(trade.start_time);
        let elapsed = u128::from(now.saturating_sub(since));
        let rate = u128::try_from(trade.flow_rate).unwrap_or(0);
        elapsed
            .saturating_mul(rate)
            .min(self.input.balance_at(now))
    }
}

fn check_flow_rate(account: Address, flow_rate: i128) -> PoolResult<()> {
    if flow_rate <= 0 {
        return Err(PoolError::InvalidFlowRate { account, flow_rate });
    }
    Ok(())
}
