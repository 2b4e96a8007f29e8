//! Flow rate to distribution unit conversion
//!
//! Units are `flow_rate / scaler`, floored. Because the division never rounds
//! up, the sum of every account's `units × scaler` stays at or below the
//! pool's true net input flow rate.

/// Converts flow rates into index-ledger units with a fixed scaler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConverter {
    scaler: u128,
}

impl UnitConverter {
    /// Create a converter; a zero scaler is treated as 1
    pub fn new(scaler: u64) -> Self {
        Self {
            scaler: u128::from(scaler.max(1)),
        }
    }

    pub fn scaler(&self) -> u128 {
        self.scaler
    }

    /// Units for `flow_rate`; zero and negative rates map to zero units
    pub fn units_for(&self, flow_rate: i128) -> u128 {
        u128::try_from(flow_rate)
            .map(|rate| rate / self.scaler)
            .unwrap_or(0)
    }
}
