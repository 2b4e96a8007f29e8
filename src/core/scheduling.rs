//! Next-distribution-time prediction
//!
//! The keeper should only distribute once the pool has accrued enough input
//! to cover the gas of the call. With every term truncated in this order:
//!
//! ```text
//! cost     = gas_price × gas_limit × token_to_native_rate / 1e9
//! flow     = net_flow_rate / 1e9
//! next     = last_distributed_at + cost / flow
//! ```
//!
//! The two separate `/ 1e9` truncations must stay where they are for parity
//! with existing deployments.

use alloy_primitives::U256;

/// Intermediate scale applied to both the cost and the flow term
pub const SCHEDULING_SCALE: u64 = 1_000_000_000;

/// Gas and price inputs for one prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasQuote {
    pub gas_price: u128,
    pub gas_limit: u128,
    /// Native-to-input-token rate scaled by 1e9
    pub token_to_native_rate: u128,
}

impl GasQuote {
    pub fn new(gas_price: u128, gas_limit: u128, token_to_native_rate: u128) -> Self {
        Self {
            gas_price,
            gas_limit,
            token_to_native_rate,
        }
    }

    /// Distribution cost in input-token terms, truncated once by the scale
    pub fn cost_term(&self) -> U256 {
        U256::from(self.gas_price)
            .saturating_mul(U256::from(self.gas_limit))
            .saturating_mul(U256::from(self.token_to_native_rate))
            / U256::from(SCHEDULING_SCALE)
    }
}

/// Timestamp at which the next distribution pays for itself
///
/// Returns `None` ("never") when the scaled net flow rate is zero or
/// negative, since no amount of waiting accrues input. A duration too large
/// for `u64` saturates.
pub fn next_distribution_time(
    last_distributed_at: u64,
    net_flow_rate: i128,
    quote: GasQuote,
) -> Option<u64> {
    let flow_term = u128::try_from(net_flow_rate).ok()? / u128::from(SCHEDULING_SCALE);
    if flow_term == 0 {
        return None;
    }

    let duration = quote.cost_term() / U256::from(flow_term);
    let duration = u64::try_from(duration).unwrap_or(u64::MAX);
    Some(last_distributed_at.saturating_add(duration))
}
