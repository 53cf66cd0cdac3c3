//! Per-address, per-period transaction activity
//!
//! Activity is an advisory signal only: the aggregator compares it with the
//! rate-limit and large-transaction thresholds, `record_trade` never rejects
//! on it.

use tradeguard_core::{Address, BlockActivity, Period};
use tradeguard_store::WindowedStore;

#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    store: WindowedStore<Address, BlockActivity>,
}

impl ActivityTracker {
    pub fn new(retention_periods: u64) -> Self {
        Self {
            store: WindowedStore::new(retention_periods),
        }
    }

    /// Activity for (address, period); zero if none
    pub fn get(&self, address: &Address, period: Period) -> BlockActivity {
        self.store.get(address, period)
    }

    /// Count one more trade of `volume`
    pub fn record(&mut self, address: &Address, period: Period, volume: u64) -> BlockActivity {
        self.store
            .update(address.clone(), period, |current| current.with_trade(volume))
    }

    /// Total volume over `from..=to` within the retention window
    pub fn volume_between(&self, address: &Address, from: Period, to: Period) -> u64 {
        self.store
            .range(address, from, to)
            .fold(0u64, |acc, (_, activity)| {
                acc.saturating_add(activity.total_volume)
            })
    }

    /// Periods currently held for `address`
    pub fn retained_periods(&self, address: &Address) -> usize {
        self.store.retained(address)
    }
}
