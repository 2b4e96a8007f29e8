//! Collaborator data types
//!
//! Plain values exchanged with the swap venue, the price feed and the index
//! ledger. None of these carry behaviour.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// Multi-hop swap request sent to the venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    /// Ordered hop assets, first is the underlying input, last the underlying output
    pub path: Vec<Address>,
    /// Fee tier of each hop (`path.len() - 1` entries)
    pub fees: Vec<u32>,
    /// Exact input amount
    pub amount_in: u128,
    /// Venue must revert if it cannot deliver at least this much
    pub min_amount_out: u128,
    /// Opaque payload forwarded from the `distribute` caller
    pub swap_data: Bytes,
}

/// Latest answer from the price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    /// Raw price in feed decimals, may be non-positive on a broken feed
    pub price: i128,
    /// Unix seconds of the last feed update
    pub updated_at: u64,
}

/// Subscription view returned by the index ledger
///
/// Mirrors the ledger's `(exists, approved, units, pendingDistribution)` tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdaShares {
    pub exists: bool,
    pub approved: bool,
    pub units: u128,
    pub pending_distribution: u128,
}

impl std::fmt::Display for IdaShares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.exists, self.approved, self.units, self.pending_distribution
        )
    }
}
