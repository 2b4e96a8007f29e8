//! Per-account trade history
//!
//! Every account owns an append-only list of `Trade` records. A trade is
//! opened when a flow starts, closed (never deleted) when the flow changes or
//! stops, and an account holds at most one open trade at any time.

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::IndexLedger;
use crate::core::events::{log_event, PoolEvent};
use crate::core::units::UnitConverter;
use crate::error::{PoolError, PoolResult};

/// One interval during which an account streamed at a fixed rate
///
/// `end_time` and `end_ida_index` stay 0 while the trade is open. The
/// all-zero value is the "no history" record returned to external callers.
/// `refunded` is input handed back unswapped when the flow terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub start_time: u64,
    pub end_time: u64,
    pub flow_rate: i128,
    pub start_ida_index: u128,
    pub end_ida_index: u128,
    pub units: u128,
    #[serde(default)]
    pub refunded: u128,
}

impl Trade {
    /// Input streamed into the pool over the closed interval
    pub fn input_amount(&self) -> i128 {
        let elapsed = i128::from(self.end_time.saturating_sub(self.start_time));
        elapsed.saturating_mul(self.flow_rate)
    }

    /// Output earned over the closed interval
    pub fn output_amount(&self) -> u128 {
        self.end_ida_index
            .saturating_sub(self.start_ida_index)
            .saturating_mul(self.units)
    }
}

#[derive(Debug, Clone, Default)]
struct AccountTrades {
    trades: Vec<Trade>,
    open: bool,
}

/// Trade ledger for every account that ever streamed into the pool
#[derive(Debug, Clone)]
pub struct TradeLedger {
    converter: UnitConverter,
    accounts: HashMap<Address, AccountTrades>,
}

impl TradeLedger {
    pub fn new(converter: UnitConverter) -> Self {
        Self {
            converter,
            accounts: HashMap::new(),
        }
    }

    pub fn converter(&self) -> UnitConverter {
        self.converter
    }

    /// Open a trade for `account` and register its units on the index ledger
    ///
    /// # Errors
    /// `PoolError::AlreadyOpen` if the account must be closed first.
    pub fn open_trade<L: IndexLedger>(
        &mut self,
        ledger: &mut L,
        account: Address,
        flow_rate: i128,
        now: u64,
        current_index: u128,
    ) -> PoolResult<Trade> {
        if self.has_open_trade(account) {
            return Err(PoolError::AlreadyOpen(account));
        }

        let units = self.converter.units_for(flow_rate);
        let trade = Trade {
            start_time: now,
            end_time: 0,
            flow_rate,
            start_ida_index: current_index,
            end_ida_index: 0,
            units,
            refunded: 0,
        };

        let entry = self.accounts.entry(account).or_default();
        entry.trades.push(trade);
        entry.open = true;
        ledger.update_subscription_units(account, units);

        debug!(account = %account, trade_count = entry.trades.len(), "[TRADE] Opened");
        log_event(&PoolEvent::trade_opened(
            account,
            flow_rate,
            units,
            current_index,
            now,
        ));
        Ok(trade)
    }

    /// Close `account`'s open trade at `now` and `current_index`
    ///
    /// Units are left untouched on the trade; the caller decides what the
    /// account's next subscription looks like.
    ///
    /// # Errors
    /// `PoolError::NoOpenTrade` if nothing is open.
    pub fn close_trade(
        &mut self,
        account: Address,
        now: u64,
        current_index: u128,
    ) -> PoolResult<Trade> {
        let entry = self
            .accounts
            .get_mut(&account)
            .filter(|entry| entry.open)
            .ok_or(PoolError::NoOpenTrade(account))?;
        let trade = entry
            .trades
            .last_mut()
            .ok_or(PoolError::NoOpenTrade(account))?;

        trade.end_time = now;
        trade.end_ida_index = current_index;
        entry.open = false;

        debug!(
            account = %account,
            start_time = trade.start_time,
            index_delta = %current_index.saturating_sub(trade.start_ida_index),
            output = %trade.output_amount(),
            "[TRADE] Closed"
        );
        log_event(&PoolEvent::trade_closed(account, trade.units, current_index, now));
        Ok(*trade)
    }

    /// Record input returned to `account` on its latest trade
    ///
    /// Returns the updated trade, `None` for an account with no history.
    pub fn record_refund(&mut self, account: Address, amount: u128) -> Option<Trade> {
        let trade = self.accounts.get_mut(&account)?.trades.last_mut()?;
        trade.refunded = trade.refunded.saturating_add(amount);
        Some(*trade)
    }

    /// Most recent trade, if the account has any history
    pub fn latest_trade(&self, account: Address) -> Option<&Trade> {
        self.accounts.get(&account).and_then(|entry| entry.trades.last())
    }

    /// The account's open trade, if any
    pub fn open_trade_of(&self, account: Address) -> Option<&Trade> {
        self.accounts
            .get(&account)
            .filter(|entry| entry.open)
            .and_then(|entry| entry.trades.last())
    }

    pub fn has_open_trade(&self, account: Address) -> bool {
        self.accounts.get(&account).is_some_and(|entry| entry.open)
    }

    pub fn trade_count(&self, account: Address) -> usize {
        self.accounts.get(&account).map_or(0, |entry| entry.trades.len())
    }

    /// Full history for `account`, oldest first
    pub fn trades(&self, account: Address) -> &[Trade] {
        self.accounts
            .get(&account)
            .map(|entry| entry.trades.as_slice())
            .unwrap_or(&[])
    }

    /// Number of accounts currently streaming
    pub fn open_trade_count(&self) -> usize {
        let count = self.accounts.values().filter(|entry| entry.open).count();
        debug!(open = count, "Open trade count");
        count
    }
}
