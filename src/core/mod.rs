//! Core module - trade ledger, distribution cycle, fee share, scheduling
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) so the public API only grows on purpose.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{DcaPool, FlowEvent, DistributeRequest};
//! ```

pub mod balance;
pub mod callbacks;
pub mod distribution;
pub mod events;
pub mod fee_share;
pub mod keeper;
pub mod oracle;
pub mod pool;
pub mod scheduling;
pub mod trades;
pub mod units;

#[cfg(test)]
pub(crate) mod test_support;

// Explicit re-exports for pool module
pub use pool::{DcaPool, SharedPool, OUTCOME_HISTORY_LIMIT};

// Explicit re-exports for callbacks module
pub use callbacks::FlowEvent;

// Explicit re-exports for distribution module
pub use distribution::{automation_fee, DistributeRequest, DistributionOutcome};

// Explicit re-exports for ledger math
pub use balance::StreamBalance;
pub use fee_share::FeeShareController;
pub use trades::{Trade, TradeLedger};
pub use units::UnitConverter;

// Explicit re-exports for oracle module
pub use oracle::{effective_price, expected_output, min_amount_out, validated_price};

// Explicit re-exports for scheduling module
pub use scheduling::{next_distribution_time, GasQuote, SCHEDULING_SCALE};

// Explicit re-exports for events module
pub use events::{log_event, PoolEvent, PoolEventType};

// Explicit re-exports for keeper runtime
pub use keeper::{keeper_task, keeper_tick, unix_now};
