//! Per-pair price history and deviation analysis
//!
//! One sample per (pair, period). A later trade in the same period overwrites
//! the sample; there is no averaging.

use serde::{Deserialize, Serialize};
use tradeguard_core::{PairId, Period, PricePoint};
use tradeguard_store::WindowedStore;

use crate::config::Thresholds;

/// One hundred percent in basis points
pub const BASIS_POINTS: u64 = 10_000;

/// Absolute change from `old` to `new` in basis points.
///
/// Returns 0 when `old` is 0. Otherwise `floor(|new - old| * 10000 / old)`,
/// saturating at `u64::MAX`.
pub fn percentage_change(old: u64, new: u64) -> u64 {
    if old == 0 {
        return 0;
    }
    let diff = u128::from(old.abs_diff(new));
    let bps = diff * u128::from(BASIS_POINTS) / u128::from(old);
    u64::try_from(bps).unwrap_or(u64::MAX)
}

/// Outcome of comparing a candidate price with the pair's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviationCheck {
    /// Most recent sample strictly before the analysed period
    pub prior: Option<(Period, PricePoint)>,
    /// Change from the prior price in basis points (0 without a prior)
    pub change_bps: u64,
    /// Deviation above threshold on volume above the minimum
    pub suspected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    store: WindowedStore<PairId, PricePoint>,
}

impl PriceHistory {
    pub fn new(retention_periods: u64) -> Self {
        Self {
            store: WindowedStore::new(retention_periods),
        }
    }

    /// Overwrite-or-create the sample at (pair, period)
    pub fn record(&mut self, pair: &PairId, period: Period, price: u64, volume: u64) {
        self.store
            .set(pair.clone(), period, PricePoint { price, volume });
    }

    /// Sample at (pair, period); zero if none
    pub fn get(&self, pair: &PairId, period: Period) -> PricePoint {
        self.store.get(pair, period)
    }

    /// Most recent sample strictly before `period`
    pub fn latest_before(&self, pair: &PairId, period: Period) -> Option<(Period, PricePoint)> {
        self.store
            .latest_before(pair, period)
            .map(|(p, point)| (p, *point))
    }

    /// Compare `price`/`volume` at `period` against the prior sample
    pub fn deviation(
        &self,
        pair: &PairId,
        period: Period,
        price: u64,
        volume: u64,
        thresholds: &Thresholds,
    ) -> DeviationCheck {
        let Some((prior_period, prior)) = self.latest_before(pair, period) else {
            return DeviationCheck::default();
        };

        let change_bps = percentage_change(prior.price, price);
        let suspected = change_bps > thresholds.max_price_deviation_bps
            && volume > thresholds.min_volume_for_price_check;

        DeviationCheck {
            prior: Some((prior_period, prior)),
            change_bps,
            suspected,
        }
    }
}
