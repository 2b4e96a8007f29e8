//! Distribution cycle
//!
//! One `distribute` call swaps the pool's accrued input, pays the automation
//! fee when the registered executor triggered it, raises the shared index
//! and moves the fee share and timestamp. The cycle is a unit of work: every
//! fallible collaborator call happens before the first pool mutation, so an
//! error at any step leaves index, fee share, timestamp and balances exactly
//! as they were.

use std::time::{Duration, Instant};

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::{AutomationRegistry, IndexLedger, PriceFeed, SwapRequest, SwapRouter};
use crate::core::events::{log_event, PoolEvent};
use crate::core::oracle::min_amount_out;
use crate::core::pool::{DcaPool, OUTCOME_HISTORY_LIMIT};
use crate::error::{PoolError, PoolResult};

/// Fee share is a whole percentage of the swap output
const FEE_SHARE_DENOMINATOR: u128 = 100;

/// Arguments of one `distribute` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributeRequest {
    /// Identity calling `distribute`; the automation executor earns the fee
    pub caller: Address,
    /// Opaque payload forwarded to the swap venue
    pub swap_data: Bytes,
    /// Bound the swap with the oracle price
    pub use_oracle: bool,
}

impl DistributeRequest {
    /// Manual call without extra swap data
    pub fn manual(caller: Address, use_oracle: bool) -> Self {
        Self {
            caller,
            swap_data: Bytes::new(),
            use_oracle,
        }
    }
}

/// Record of one completed distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub id: Uuid,
    pub caller: Address,
    /// Triggered by the registered automation executor
    pub automated: bool,
    /// Input tokens swapped
    pub amount_in: u128,
    /// Output received from the venue
    pub amount_out: u128,
    /// Automation fee paid out of `amount_out`
    pub fee: u128,
    /// Output handed to subscribers by the index bump
    pub distributed: u128,
    pub index_delta: u128,
    pub new_index: u128,
    /// Fee share after this cycle's adjustment
    pub fee_share: u32,
    pub distributed_at: u64,
}

/// Automation fee for `amount_out` at `fee_share` percent
pub fn automation_fee(amount_out: u128, fee_share: u32) -> u128 {
    let fee = U256::from(amount_out).saturating_mul(U256::from(fee_share))
        / U256::from(FEE_SHARE_DENOMINATOR);
    // fee_share <= 100 keeps this within amount_out
    u128::try_from(fee).unwrap_or(amount_out).min(amount_out)
}

fn latency_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl<L, R, P, A> DcaPool<L, R, P, A>
where
    L: IndexLedger,
    R: SwapRouter,
    P: PriceFeed,
    A: AutomationRegistry,
{
    /// Run one distribution cycle at `now`
    ///
    /// # Errors
    /// - `PoolError::Oracle` if the oracle bound cannot be computed
    /// - `PoolError::SwapFailed` if the venue rejects the swap
    /// - `PoolError::FeePayment` if the automation fee transfer fails
    /// - `PoolError::Ledger` if the index ledger rejects the bump
    ///
    /// Every error leaves the pool unchanged.
    pub async fn distribute(
        &mut self,
        request: DistributeRequest,
        now: u64,
    ) -> PoolResult<DistributionOutcome> {
        let started = Instant::now();
        let caller = request.caller;

        match self.run_cycle(request, now).await {
            Ok(outcome) => {
                info!(
                    id = %outcome.id,
                    automated = outcome.automated,
                    amount_in = %outcome.amount_in,
                    amount_out = %outcome.amount_out,
                    fee = %outcome.fee,
                    new_index = %outcome.new_index,
                    fee_share = outcome.fee_share,
                    latency_ms = latency_ms(started.elapsed()),
                    "[DISTRIBUTE] Cycle complete"
                );
                Ok(outcome)
            }
            Err(e) => {
                log_event(&PoolEvent::distribution_failed(caller, &e.to_string(), now));
                Err(e)
            }
        }
    }

    async fn run_cycle(
        &mut self,
        request: DistributeRequest,
        now: u64,
    ) -> PoolResult<DistributionOutcome> {
        let automated = request.caller == self.automation.executor();
        let amount_in = self.input.balance_at(now);

        // 1. Swap (no pool state touched yet)
        let amount_out = if amount_in == 0 {
            debug!("[DISTRIBUTE] No accrued input, skipping swap");
            0
        } else {
            let min_out = if request.use_oracle {
                let data = self
                    .price_feed
                    .latest_price()
                    .await
                    .map_err(|e| PoolError::Oracle(e.to_string()))?;
                min_amount_out(amount_in, data, now, &self.oracle, self.config.invert_price)?
            } else {
                0
            };

            let swap = SwapRequest {
                path: self.config.swap_path.clone(),
                fees: self.config.pool_fees.clone(),
                amount_in,
                min_amount_out: min_out,
                swap_data: request.swap_data,
            };
            debug!(amount_in = %amount_in, min_out = %min_out, "[DISTRIBUTE] Swapping");
            self.router.swap(swap).await.map_err(PoolError::SwapFailed)?
        };

        // 2. Plan the index bump before paying anything out
        let fee = if automated {
            automation_fee(amount_out, self.fee_share)
        } else {
            0
        };
        let distributable = self
            .output_balance
            .saturating_add(amount_out.saturating_sub(fee));
        let current_index = self.ledger.index_value();
        let total_units = self.ledger.total_units();
        let index_delta = if total_units == 0 {
            0
        } else {
            distributable / total_units
        };
        let new_index = current_index
            .checked_add(index_delta)
            .ok_or_else(|| PoolError::Ledger("index value overflows".to_string()))?;

        // 3. Fee payment is the last fallible external call
        if fee > 0 {
            self.automation
                .pay_fee(self.config.output_token, fee)
                .await
                .map_err(PoolError::FeePayment)?;
            info!(fee = %fee, fee_share = self.fee_share, "[FEE] Automation fee paid");
        }

        // 4. Commit
        let distributed = if index_delta > 0 {
            self.ledger
                .update_index_value(new_index)
                .map_err(PoolError::Ledger)?
        } else {
            0
        };

        let elapsed = now.saturating_sub(self.last_distributed_at);
        self.fee_share = self.fee_controller.adjust(elapsed, self.fee_share);
        self.last_distributed_at = now;
        self.input.debit(now, amount_in);
        self.output_balance = distributable.saturating_sub(distributed);

        let outcome = DistributionOutcome {
            id: Uuid::new_v4(),
            caller: request.caller,
            automated,
            amount_in,
            amount_out,
            fee,
            distributed,
            index_delta,
            new_index: self.ledger.index_value(),
            fee_share: self.fee_share,
            distributed_at: now,
        };

        if self.outcomes.len() >= OUTCOME_HISTORY_LIMIT {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome.clone());

        log_event(&PoolEvent::distribution(
            outcome.caller,
            amount_in,
            amount_out,
            fee,
            distributed,
            outcome.new_index,
            now,
        ));
        log_event(&PoolEvent::fee_share_adjusted(self.fee_share, now));

        Ok(outcome)
    }
}
