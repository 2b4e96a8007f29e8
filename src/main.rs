//! DCA pool keeper - entry point
//!
//! Runs one pool against simulated collaborators:
//! 1. Loads configuration (`POOL_CONFIG`, default `config.yaml`)
//! 2. Builds the pool with an in-memory index ledger
//! 3. Opens the configured simulated flows
//! 4. Runs the keeper loop until Ctrl+C

use anyhow::Context;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use dca_pool::adapters::{
    InMemoryIndexLedger, SimulatedAutomation, SimulatedPriceFeed, SimulatedVenue,
};
use dca_pool::config::{self, AppConfig};
use dca_pool::core::{keeper_task, unix_now, DcaPool, FlowEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    config::init_logging();

    info!("DCA pool keeper starting...");

    let config_path = config::config_path_from_env();
    info!(path = %config_path.display(), "[CONFIG] Loading configuration");
    let config: AppConfig = match config::load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("[CONFIG] Configuration failed: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        input_token = %config.pool.input_token,
        output_token = %config.pool.output_token,
        hops = config.pool.swap_path.len(),
        invert_price = config.pool.invert_price,
        "[CONFIG] Pool configuration loaded"
    );

    let simulation = &config.simulation;
    let venue = SimulatedVenue::new(
        u128::from(simulation.reference_price),
        config.oracle.price_decimals,
        config.pool.invert_price,
    );
    let feed = SimulatedPriceFeed::new(i128::from(simulation.reference_price));
    let automation = SimulatedAutomation::new(simulation.executor);

    let now = unix_now();
    let mut pool = DcaPool::new(
        &config,
        InMemoryIndexLedger::new(),
        venue,
        feed,
        automation.clone(),
        now,
    )
    .context("failed to create pool")?;

    for flow in &simulation.flows {
        pool.approve_subscription(flow.account);
        pool.on_flow_event(
            FlowEvent::Created {
                account: flow.account,
                token: config.pool.input_token,
                flow_rate: i128::from(flow.flow_rate),
            },
            now,
        )
        .await
        .with_context(|| format!("failed to open simulated flow for {}", flow.account))?;
    }
    info!(flows = simulation.flows.len(), "[CONFIG] Simulated flows opened");

    let pool = pool.into_shared();

    // Create shutdown broadcast channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Spawn SIGINT handler task
    let shutdown_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("[SHUTDOWN] Graceful shutdown initiated");
                let _ = shutdown_signal.send(());
            }
            Err(err) => {
                eprintln!("Failed to listen for Ctrl+C signal: {}", err);
            }
        }
    });

    let keeper = tokio::spawn(keeper_task(
        pool.clone(),
        config.keeper.clone(),
        shutdown_tx.subscribe(),
    ));

    keeper.await.context("keeper task panicked")?;

    let pool = pool.lock().await;
    info!(
        index = %pool.get_ida_index_value(),
        fee_share = pool.gelato_fee_share(),
        last_distributed_at = pool.last_distributed_at(),
        fees_collected = automation.collected(),
        "[SHUTDOWN] Clean exit"
    );
    Ok(())
}
