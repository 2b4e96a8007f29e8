//! Shared test doubles for the pool's collaborators
//!
//! Each mock keeps its switches and counters behind `Arc`s, so a test can
//! clone the mock, hand one copy to the pool, and keep steering the other.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::Address;

use crate::adapters::errors::{CollaboratorError, CollaboratorResult};
use crate::adapters::traits::{AutomationRegistry, PriceFeed, SwapRouter};
use crate::adapters::types::{PriceData, SwapRequest};

// =============================================================================
// Swap venue
// =============================================================================

/// Fixed-rate swap venue: `amount_out = amount_in × numerator / denominator`
#[derive(Debug, Clone)]
pub struct MockSwapRouter {
    numerator: Arc<AtomicU64>,
    denominator: u64,
    /// When true, `swap` reverts
    pub should_fail: Arc<AtomicBool>,
    /// Number of swaps attempted
    pub swap_count: Arc<AtomicU64>,
    /// Last request received, for path/fee assertions
    pub last_request: Arc<Mutex<Option<SwapRequest>>>,
}

impl MockSwapRouter {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator: Arc::new(AtomicU64::new(numerator)),
            denominator: denominator.max(1),
            should_fail: Arc::new(AtomicBool::new(false)),
            swap_count: Arc::new(AtomicU64::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Venue that returns exactly what it receives
    pub fn one_to_one() -> Self {
        Self::new(1, 1)
    }

    pub fn set_failure(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Change the execution rate numerator (simulates price moves)
    pub fn set_rate(&self, numerator: u64) {
        self.numerator.store(numerator, Ordering::SeqCst);
    }

    pub fn swaps(&self) -> u64 {
        self.swap_count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SwapRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SwapRouter for MockSwapRouter {
    async fn swap(&self, request: SwapRequest) -> CollaboratorResult<u128> {
        self.swap_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Reverted("Mock venue failure".to_string()));
        }

        let amount_out = request.amount_in * u128::from(self.numerator.load(Ordering::SeqCst))
            / u128::from(self.denominator);
        if amount_out < request.min_amount_out {
            return Err(CollaboratorError::SlippageExceeded {
                amount_out,
                min_amount_out: request.min_amount_out,
            });
        }
        Ok(amount_out)
    }
}

// =============================================================================
// Price feed
// =============================================================================

/// Price feed returning whatever the test last set
#[derive(Debug, Clone)]
pub struct MockPriceFeed {
    data: Arc<Mutex<PriceData>>,
    /// When true, `latest_price` is unavailable
    pub should_fail: Arc<AtomicBool>,
}

impl MockPriceFeed {
    pub fn new(price: i128, updated_at: u64) -> Self {
        Self {
            data: Arc::new(Mutex::new(PriceData { price, updated_at })),
            should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_price(&self, price: i128, updated_at: u64) {
        if let Ok(mut data) = self.data.lock() {
            *data = PriceData { price, updated_at };
        }
    }

    pub fn set_failure(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PriceFeed for MockPriceFeed {
    async fn latest_price(&self) -> CollaboratorResult<PriceData> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("Mock feed offline".to_string()));
        }
        self.data
            .lock()
            .map(|data| *data)
            .map_err(|_| CollaboratorError::Unavailable("Mock feed poisoned".to_string()))
    }
}

// =============================================================================
// Automation registry
// =============================================================================

/// Automation registry recording every fee it is paid
#[derive(Debug, Clone)]
pub struct MockAutomationRegistry {
    executor: Address,
    /// When true, `pay_fee` fails
    pub should_fail: Arc<AtomicBool>,
    /// Fees received as `(token, amount)`
    pub fees_paid: Arc<Mutex<Vec<(Address, u128)>>>,
}

impl MockAutomationRegistry {
    pub fn new(executor: Address) -> Self {
        Self {
            executor,
            should_fail: Arc::new(AtomicBool::new(false)),
            fees_paid: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_failure(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn total_fees(&self) -> u128 {
        self.fees_paid
            .lock()
            .map(|fees| fees.iter().map(|(_, amount)| *amount).sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl AutomationRegistry for MockAutomationRegistry {
    fn executor(&self) -> Address {
        self.executor
    }

    async fn pay_fee(&self, fee_token: Address, amount: u128) -> CollaboratorResult<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::TransferFailed("Mock fee sink failure".to_string()));
        }
        if let Ok(mut fees) = self.fees_paid.lock() {
            fees.push((fee_token, amount));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    fn request(amount_in: u128, min_amount_out: u128) -> SwapRequest {
        SwapRequest {
            path: vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            fees: vec![3000],
            amount_in,
            min_amount_out,
            swap_data: Bytes::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_router_applies_rate() {
        let router = MockSwapRouter::new(1, 2);
        let out = router.swap(request(1_000, 0)).await.unwrap();
        assert_eq!(out, 500);
        assert_eq!(router.swaps(), 1);
        assert_eq!(router.last_request().unwrap().amount_in, 1_000);
    }

    #[tokio::test]
    async fn test_mock_router_enforces_min_out() {
        let router = MockSwapRouter::new(1, 2);
        let result = router.swap(request(1_000, 600)).await;
        assert_eq!(
            result,
            Err(CollaboratorError::SlippageExceeded {
                amount_out: 500,
                min_amount_out: 600
            })
        );
    }

    #[tokio::test]
    async fn test_mock_router_failure_switch_is_shared() {
        let router = MockSwapRouter::one_to_one();
        let handle = router.clone();
        handle.set_failure(true);
        assert!(router.swap(request(1, 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_registry_records_fees() {
        let registry = MockAutomationRegistry::new(Address::repeat_byte(9));
        registry.pay_fee(Address::repeat_byte(3), 7).await.unwrap();
        registry.pay_fee(Address::repeat_byte(3), 5).await.unwrap();
        assert_eq!(registry.total_fees(), 12);

        registry.set_failure(true);
        assert!(registry.pay_fee(Address::repeat_byte(3), 1).await.is_err());
        assert_eq!(registry.total_fees(), 12);
    }
}
