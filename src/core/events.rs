//! Pool event system
//!
//! Structured events for everything that changes pool state. All events share
//! one schema so a pool's history can be rebuilt from the log stream.
//!
//! # Event Types
//!
//! - **TradeOpened** / **TradeClosed**: trade ledger lifecycle
//! - **UnitsUpdated**: an account's share of the index changed
//! - **InputRefunded**: a terminating flow got its unswapped input back
//! - **Distribution**: one completed distribute cycle
//! - **DistributionFailed**: a distribute call rolled back
//! - **FeeShareAdjusted**: automation fee share moved after a cycle
//!
//! # Example
//!
//! ```ignore
//! use crate::core::events::{PoolEvent, log_event};
//!
//! log_event(&PoolEvent::trade_opened(account, flow_rate, units, index, now));
//! ```

use std::fmt;

use alloy_primitives::Address;
use tracing::{debug, info, warn};

/// Pool event types for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEventType {
    // Trade events
    TradeOpened,
    TradeClosed,
    UnitsUpdated,
    InputRefunded,

    // Distribution events
    Distribution,
    DistributionFailed,
    FeeShareAdjusted,

    // Keeper events
    KeeperStarted,
    KeeperShutdown,
}

impl fmt::Display for PoolEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolEventType::TradeOpened => write!(f, "TRADE_OPENED"),
            PoolEventType::TradeClosed => write!(f, "TRADE_CLOSED"),
            PoolEventType::UnitsUpdated => write!(f, "UNITS_UPDATED"),
            PoolEventType::InputRefunded => write!(f, "INPUT_REFUNDED"),
            PoolEventType::Distribution => write!(f, "DISTRIBUTION"),
            PoolEventType::DistributionFailed => write!(f, "DISTRIBUTION_FAILED"),
            PoolEventType::FeeShareAdjusted => write!(f, "FEE_SHARE_ADJUSTED"),
            PoolEventType::KeeperStarted => write!(f, "KEEPER_STARTED"),
            PoolEventType::KeeperShutdown => write!(f, "KEEPER_SHUTDOWN"),
        }
    }
}

/// Pool event with every optional context field
///
/// `timestamp` is pool time (unix seconds passed into the operation), not
/// wall-clock time, so replays log the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolEvent {
    pub event_type: Option<PoolEventType>,
    pub timestamp: u64,
    pub account: Option<Address>,
    pub flow_rate: Option<i128>,
    pub units: Option<u128>,
    pub index: Option<u128>,
    pub amount_in: Option<u128>,
    pub amount_out: Option<u128>,
    pub fee: Option<u128>,
    pub distributed: Option<u128>,
    pub refunded: Option<u128>,
    pub fee_share: Option<u32>,
    pub reason: Option<String>,
}

impl PoolEvent {
    pub fn new(event_type: PoolEventType, timestamp: u64) -> Self {
        Self {
            event_type: Some(event_type),
            timestamp,
            ..Self::default()
        }
    }

    pub fn trade_opened(
        account: Address,
        flow_rate: i128,
        units: u128,
        index: u128,
        timestamp: u64,
    ) -> Self {
        Self {
            account: Some(account),
            flow_rate: Some(flow_rate),
            units: Some(units),
            index: Some(index),
            ..Self::new(PoolEventType::TradeOpened, timestamp)
        }
    }

    pub fn trade_closed(account: Address, units: u128, index: u128, timestamp: u64) -> Self {
        Self {
            account: Some(account),
            units: Some(units),
            index: Some(index),
            ..Self::new(PoolEventType::TradeClosed, timestamp)
        }
    }

    pub fn units_updated(account: Address, units: u128, timestamp: u64) -> Self {
        Self {
            account: Some(account),
            units: Some(units),
            ..Self::new(PoolEventType::UnitsUpdated, timestamp)
        }
    }

    pub fn input_refunded(account: Address, amount: u128, timestamp: u64) -> Self {
        Self {
            account: Some(account),
            refunded: Some(amount),
            ..Self::new(PoolEventType::InputRefunded, timestamp)
        }
    }

    pub fn distribution(
        caller: Address,
        amount_in: u128,
        amount_out: u128,
        fee: u128,
        distributed: u128,
        new_index: u128,
        timestamp: u64,
    ) -> Self {
        Self {
            account: Some(caller),
            amount_in: Some(amount_in),
            amount_out: Some(amount_out),
            fee: Some(fee),
            distributed: Some(distributed),
            index: Some(new_index),
            ..Self::new(PoolEventType::Distribution, timestamp)
        }
    }

    pub fn distribution_failed(caller: Address, reason: &str, timestamp: u64) -> Self {
        Self {
            account: Some(caller),
            reason: Some(reason.to_string()),
            ..Self::new(PoolEventType::DistributionFailed, timestamp)
        }
    }

    pub fn fee_share_adjusted(fee_share: u32, timestamp: u64) -> Self {
        Self {
            fee_share: Some(fee_share),
            ..Self::new(PoolEventType::FeeShareAdjusted, timestamp)
        }
    }

    pub fn keeper_started(timestamp: u64) -> Self {
        Self::new(PoolEventType::KeeperStarted, timestamp)
    }

    pub fn keeper_shutdown(timestamp: u64) -> Self {
        Self::new(PoolEventType::KeeperShutdown, timestamp)
    }
}

/// Emit a pool event through tracing
///
/// Ledger bookkeeping (units, fee share) goes to DEBUG, failures to WARN,
/// everything else to INFO.
pub fn log_event(event: &PoolEvent) {
    let event_type = event
        .event_type
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let account = event.account.map(|account| account.to_string());

    match event.event_type {
        Some(PoolEventType::UnitsUpdated) | Some(PoolEventType::FeeShareAdjusted) => {
            debug!(
                event_type = %event_type,
                timestamp = event.timestamp,
                account = ?account,
                units = ?event.units,
                fee_share = ?event.fee_share,
                ""
            );
        }
        Some(PoolEventType::DistributionFailed) => {
            warn!(
                event_type = %event_type,
                timestamp = event.timestamp,
                account = ?account,
                reason = ?event.reason,
                ""
            );
        }
        _ => {
            info!(
                event_type = %event_type,
                timestamp = event.timestamp,
                account = ?account,
                flow_rate = ?event.flow_rate,
                units = ?event.units,
                index = ?event.index,
                amount_in = ?event.amount_in,
                amount_out = ?event.amount_out,
                fee = ?event.fee,
                distributed = ?event.distributed,
                refunded = ?event.refunded,
                ""
            );
        }
    }
}
