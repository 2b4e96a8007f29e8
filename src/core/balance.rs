//! Input-token balance accrued from streams
//!
//! Between flow events the balance grows linearly at the pool's net flow
//! rate. Each flow event settles the accrual before the rate changes, and each
//! distribution debits what it swapped.

/// Settled balance plus linear accrual at `net_flow_rate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamBalance {
    settled: u128,
    settled_at: u64,
    net_flow_rate: i128,
}

impl StreamBalance {
    pub fn new(now: u64) -> Self {
        Self {
            settled_at: now,
            ..Self::default()
        }
    }

    pub fn net_flow_rate(&self) -> i128 {
        self.net_flow_rate
    }

    /// Balance at `now`; times before the last settlement accrue nothing
    pub fn balance_at(&self, now: u64) -> u128 {
        let elapsed = u128::from(now.saturating_sub(self.settled_at));
        let rate = u128::try_from(self.net_flow_rate).unwrap_or(0);
        self.settled.saturating_add(elapsed.saturating_mul(rate))
    }

    /// Fold accrual up to `now` into the settled balance
    pub fn settle(&mut self, now: u64) {
        self.settled = self.balance_at(now);
        self.settled_at = self.settled_at.max(now);
    }

    /// Settle, then move the net rate by `delta`
    pub fn apply_flow_delta(&mut self, now: u64, delta: i128) {
        self.settle(now);
        self.net_flow_rate = self.net_flow_rate.saturating_add(delta);
    }

    /// Settle, then remove `amount` (capped at the balance)
    pub fn debit(&mut self, now: u64, amount: u128) {
        self.settle(now);
        self.settled = self.settled.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrues_linearly() {
        let mut balance = StreamBalance::new(100);
        balance.apply_flow_delta(100, 5);
        assert_eq!(balance.balance_at(100), 0);
        assert_eq!(balance.balance_at(110), 50);
    }

    #[test]
    fn test_rate_change_settles_first() {
        let mut balance = StreamBalance::new(0);
        balance.apply_flow_delta(0, 10);
        balance.apply_flow_delta(10, 20);
        assert_eq!(balance.net_flow_rate(), 30);
        assert_eq!(balance.balance_at(20), 100 + 300);
    }

    #[test]
    fn test_debit_keeps_residual() {
        let mut balance = StreamBalance::new(0);
        balance.apply_flow_delta(0, 10);
        balance.debit(10, 60);
        assert_eq!(balance.balance_at(10), 40);
        assert_eq!(balance.balance_at(11), 50);
    }

    #[test]
    fn test_stream_stop_freezes_balance() {
        let mut balance = StreamBalance::new(0);
        balance.apply_flow_delta(0, 10);
        balance.apply_flow_delta(5, -10);
        assert_eq!(balance.net_flow_rate(), 0);
        assert_eq!(balance.balance_at(1_000), 50);
    }

    #[test]
    fn test_past_time_does_not_rewind() {
        let mut balance = StreamBalance::new(100);
        balance.apply_flow_delta(100, 1);
        balance.settle(50);
        assert_eq!(balance.balance_at(150), 50);
    }
}
