//! Keeper runtime task
//!
//! Polls the pool on a fixed interval and, once the scheduling predictor says
//! a distribution pays for its gas, calls `distribute` as the registered
//! automation executor. Failed cycles are logged and retried on the next due
//! tick; the pool's own rollback guarantees make retries safe.

use alloy_primitives::Bytes;
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use crate::adapters::{AutomationRegistry, IndexLedger, PriceFeed, SwapRouter};
use crate::config::KeeperConfig;
use crate::core::distribution::{DistributeRequest, DistributionOutcome};
use crate::core::events::{log_event, PoolEvent};
use crate::core::pool::SharedPool;
use crate::core::scheduling::GasQuote;
use crate::error::PoolResult;

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

impl From<&KeeperConfig> for GasQuote {
    fn from(config: &KeeperConfig) -> Self {
        GasQuote::new(
            u128::from(config.gas_price),
            u128::from(config.gas_limit),
            u128::from(config.token_to_native_rate),
        )
    }
}

/// One keeper poll at `now`
///
/// Returns `None` when no distribution is due yet, otherwise the result of
/// the `distribute` call made as the automation executor.
pub async fn keeper_tick<L, R, P, A>(
    pool: &SharedPool<L, R, P, A>,
    quote: GasQuote,
    now: u64,
) -> Option<PoolResult<DistributionOutcome>>
where
    L: IndexLedger,
    R: SwapRouter,
    P: PriceFeed,
    A: AutomationRegistry,
{
    let mut pool = pool.lock().await;

    let due_at = match pool.get_next_distribution_time(quote) {
        Some(due_at) if now >= due_at => due_at,
        next => {
            debug!(now = now, next = ?next, "[KEEPER] Distribution not due");
            return None;
        }
    };

    let request = DistributeRequest {
        caller: pool.automation().executor(),
        swap_data: Bytes::new(),
        use_oracle: true,
    };
    debug!(due_at = due_at, now = now, "[KEEPER] Distribution due");
    Some(pool.distribute(request, now).await)
}

/// Keeper loop; exits on the shutdown broadcast
pub async fn keeper_task<L, R, P, A>(
    pool: SharedPool<L, R, P, A>,
    config: KeeperConfig,
    mut shutdown_rx: broadcast::Receiver<()>,
) where
    L: IndexLedger,
    R: SwapRouter,
    P: PriceFeed,
    A: AutomationRegistry,
{
    let quote = GasQuote::from(&config);
    let mut poll = interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    let mut distributions: u64 = 0;
    let mut failures: u64 = 0;

    log_event(&PoolEvent::keeper_started(unix_now()));
    info!(
        poll_interval_secs = config.poll_interval_secs,
        gas_limit = config.gas_limit,
        gas_price = config.gas_price,
        "[KEEPER] Started"
    );

    loop {
        tokio::select! {
            // Shutdown takes priority
            _ = shutdown_rx.recv() => {
                info!(
                    distributions = distributions,
                    failures = failures,
                    "[KEEPER] Shutting down"
                );
                break;
            }
            _ = poll.tick() => {
                match keeper_tick(&pool, quote, unix_now()).await {
                    Some(Ok(outcome)) => {
                        distributions += 1;
                        info!(
                            id = %outcome.id,
                            amount_in = %outcome.amount_in,
                            amount_out = %outcome.amount_out,
                            fee = %outcome.fee,
                            distributions = distributions,
                            "[KEEPER] Distributed"
                        );
                    }
                    Some(Err(e)) => {
                        failures += 1;
                        error!(error = %e, failures = failures, "[KEEPER] Distribution failed, retrying next tick");
                    }
                    None => {}
                }
            }
        }
    }

    log_event(&PoolEvent::keeper_shutdown(unix_now()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    use crate::adapters::test_utils::{MockAutomationRegistry, MockPriceFeed, MockSwapRouter};
    use crate::adapters::InMemoryIndexLedger;
    use crate::core::callbacks::FlowEvent;
    use crate::core::pool::DcaPool;
    use crate::core::test_support::{sample_config, EXECUTOR, INPUT_TOKEN, START};

    // Flow term of 10 after the 1e9 scale
    const RATE: i128 = 10_000_000_000;

    type TestShared =
        SharedPool<InMemoryIndexLedger, MockSwapRouter, MockPriceFeed, MockAutomationRegistry>;

    fn shared_pool(automation: MockAutomationRegistry) -> TestShared {
        DcaPool::new(
            &sample_config(),
            InMemoryIndexLedger::new(),
            MockSwapRouter::one_to_one(),
            MockPriceFeed::new(100_000_000, START),
            automation,
            START,
        )
        .unwrap()
        .into_shared()
    }

    fn quote() -> GasQuote {
        GasQuote::from(&KeeperConfig::default())
    }

    #[test]
    fn test_quote_from_keeper_config() {
        assert_eq!(quote(), GasQuote::new(3_200, 120_000, 1_000_000_000));
    }

    #[tokio::test]
    async fn test_tick_without_flow_does_nothing() {
        let pool = shared_pool(MockAutomationRegistry::new(EXECUTOR));
        assert!(keeper_tick(&pool, quote(), START + 1_000_000).await.is_none());
    }

    #[tokio::test]
    async fn test_tick_distributes_once_due() {
        let automation = MockAutomationRegistry::new(EXECUTOR);
        let pool = shared_pool(automation.clone());
        pool.lock()
            .await
            .on_flow_event(
                FlowEvent::Created {
                    account: Address::repeat_byte(0xA1),
                    token: INPUT_TOKEN,
                    flow_rate: RATE,
                },
                START,
            )
            .await
            .unwrap();

        // 3200 × 120000 / 10 = 38_400_000 seconds of accrual needed
        let due = START + 38_400_000;
        assert!(keeper_tick(&pool, quote(), due - 1).await.is_none());

        // Feed answer must be fresh at the due time
        pool.lock().await.price_feed.set_price(100_000_000, due);
        let outcome = keeper_tick(&pool, quote(), due).await.unwrap().unwrap();
        assert!(outcome.automated);
        assert!(outcome.fee > 0);
        assert_eq!(pool.lock().await.last_distributed_at(), due);
        assert_eq!(automation.total_fees(), outcome.fee);
    }

    #[tokio::test]
    async fn test_task_stops_on_shutdown() {
        let pool = shared_pool(MockAutomationRegistry::new(EXECUTOR));
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let handle = tokio::spawn(keeper_task(pool, KeeperConfig::default(), shutdown_rx));

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("keeper did not stop")
            .unwrap();
    }
}
