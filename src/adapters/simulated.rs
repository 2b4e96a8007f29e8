//! Simulated collaborators for running the keeper without a chain
//!
//! The venue prices every swap at a fixed reference price and charges each
//! hop's fee tier; the feed always reports that price as fresh.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::adapters::errors::{CollaboratorError, CollaboratorResult};
use crate::adapters::traits::{AutomationRegistry, PriceFeed, SwapRouter};
use crate::adapters::types::{PriceData, SwapRequest};
use crate::core::keeper::unix_now;

/// Fee tiers are expressed in hundredths of a basis point
const FEE_TIER_DENOMINATOR: u32 = 1_000_000;

/// Venue executing at `price` (feed decimals), optionally inverted
#[derive(Debug, Clone)]
pub struct SimulatedVenue {
    price: u128,
    price_decimals: u32,
    invert_price: bool,
}

impl SimulatedVenue {
    pub fn new(price: u128, price_decimals: u32, invert_price: bool) -> Self {
        Self {
            price,
            price_decimals,
            invert_price,
        }
    }

    fn quote(&self, request: &SwapRequest) -> Option<u128> {
        let scale = U256::from(10u64).checked_pow(U256::from(self.price_decimals))?;
        let amount_in = U256::from(request.amount_in);
        let price = U256::from(self.price);
        let mut out = if self.invert_price {
            amount_in.checked_mul(price)?.checked_div(scale)?
        } else {
            amount_in.checked_mul(scale)?.checked_div(price)?
        };
        for fee in &request.fees {
            let keep = U256::from(FEE_TIER_DENOMINATOR.saturating_sub(*fee));
            out = out.checked_mul(keep)? / U256::from(FEE_TIER_DENOMINATOR);
        }
        u128::try_from(out).ok()
    }
}

#[async_trait]
impl SwapRouter for SimulatedVenue {
    async fn swap(&self, request: SwapRequest) -> CollaboratorResult<u128> {
        let amount_out = self
            .quote(&request)
            .ok_or_else(|| CollaboratorError::Reverted("quote overflow".to_string()))?;
        if amount_out < request.min_amount_out {
            return Err(CollaboratorError::SlippageExceeded {
                amount_out,
                min_amount_out: request.min_amount_out,
            });
        }
        Ok(amount_out)
    }
}

/// Feed that always reports its fixed price as updated right now
#[derive(Debug, Clone)]
pub struct SimulatedPriceFeed {
    price: i128,
}

impl SimulatedPriceFeed {
    pub fn new(price: i128) -> Self {
        Self { price }
    }
}

#[async_trait]
impl PriceFeed for SimulatedPriceFeed {
    async fn latest_price(&self) -> CollaboratorResult<PriceData> {
        Ok(PriceData {
            price: self.price,
            updated_at: unix_now(),
        })
    }
}

/// Automation registry that accepts every fee and keeps a running total
#[derive(Debug, Clone)]
pub struct SimulatedAutomation {
    executor: Address,
    collected: Arc<AtomicU64>,
}

impl SimulatedAutomation {
    pub fn new(executor: Address) -> Self {
        Self {
            executor,
            collected: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fees collected so far, saturating at `u64::MAX`
    pub fn collected(&self) -> u64 {
        self.collected.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AutomationRegistry for SimulatedAutomation {
    fn executor(&self) -> Address {
        self.executor
    }

    async fn pay_fee(&self, fee_token: Address, amount: u128) -> CollaboratorResult<()> {
        let amount_u64 = u64::try_from(amount).unwrap_or(u64::MAX);
        let _ = self
            .collected
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some(c.saturating_add(amount_u64))
            });
        info!(token = %fee_token, amount = amount, "[FEE] Automation fee collected");
        Ok(())
    }
}
