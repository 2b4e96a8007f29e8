//! In-process pro-rata index ledger
//!
//! Holds units per subscriber and one cumulative index. Raising the index by
//! `d` hands out `d × total_units`; a subscriber's accrual is settled lazily
//! as `units × (index − settled_index)` whenever its units or approval change.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::adapters::traits::IndexLedger;
use crate::adapters::types::IdaShares;

#[derive(Debug, Clone, Default)]
struct Subscriber {
    approved: bool,
    units: u128,
    settled_index: u128,
    pending: u128,
    balance: u128,
}

impl Subscriber {
    fn accrued(&self, index: u128) -> u128 {
        self.units
            .saturating_mul(index.saturating_sub(self.settled_index))
    }

    fn settle(&mut self, index: u128) {
        let accrued = self.accrued(index);
        if self.approved {
            self.balance = self.balance.saturating_add(accrued);
        } else {
            self.pending = self.pending.saturating_add(accrued);
        }
        self.settled_index = index;
    }
}

/// Index ledger kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndexLedger {
    index_value: u128,
    total_units: u128,
    subscribers: HashMap<Address, Subscriber>,
}

impl InMemoryIndexLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts that ever subscribed or approved
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl IndexLedger for InMemoryIndexLedger {
    fn index_value(&self) -> u128 {
        self.index_value
    }

    fn total_units(&self) -> u128 {
        self.total_units
    }

    fn subscription(&self, account: Address) -> IdaShares {
        match self.subscribers.get(&account) {
            Some(sub) => {
                let unsettled = if sub.approved {
                    0
                } else {
                    sub.accrued(self.index_value)
                };
                IdaShares {
                    exists: true,
                    approved: sub.approved,
                    units: sub.units,
                    pending_distribution: sub.pending.saturating_add(unsettled),
                }
            }
            None => IdaShares::default(),
        }
    }

    fn approve_subscription(&mut self, account: Address) {
        let index = self.index_value;
        let sub = self.subscribers.entry(account).or_insert_with(|| Subscriber {
            settled_index: index,
            ..Subscriber::default()
        });
        sub.settle(index);
        sub.approved = true;
        // Approving claims whatever accrued while unapproved
        sub.balance = sub.balance.saturating_add(sub.pending);
        sub.pending = 0;
    }

    fn update_subscription_units(&mut self, account: Address, units: u128) {
        let index = self.index_value;
        let sub = self.subscribers.entry(account).or_insert_with(|| Subscriber {
            settled_index: index,
            ..Subscriber::default()
        });
        sub.settle(index);
        self.total_units = self.total_units.saturating_sub(sub.units).saturating_add(units);
        sub.units = units;
    }

    fn update_index_value(&mut self, new_value: u128) -> Result<u128, String> {
        if new_value < self.index_value {
            return Err(format!(
                "index can only increase (current {}, requested {})",
                self.index_value, new_value
            ));
        }
        let distributed = (new_value - self.index_value)
            .checked_mul(self.total_units)
            .ok_or_else(|| "distribution amount overflows".to_string())?;
        self.index_value = new_value;
        Ok(distributed)
    }

    fn balance_of(&self, account: Address) -> u128 {
        match self.subscribers.get(&account) {
            Some(sub) if sub.approved => sub.balance.saturating_add(sub.accrued(self.index_value)),
            Some(sub) => sub.balance,
            None => 0,
        }
    }
}
