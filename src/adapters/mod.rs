//! Collaborator adapters for the swap venue, price feed, automation
//! registry and index ledger
//!
//! This module provides the seams between the pool's accounting core and
//! the external contracts it consumes.

pub mod errors;
pub mod index_ledger;
pub mod simulated;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use errors::{CollaboratorError, CollaboratorResult};
pub use index_ledger::InMemoryIndexLedger;
pub use simulated::{SimulatedAutomation, SimulatedPriceFeed, SimulatedVenue};
pub use traits::{AutomationRegistry, IndexLedger, PriceFeed, SwapRouter};
pub use types::{IdaShares, PriceData, SwapRequest};
