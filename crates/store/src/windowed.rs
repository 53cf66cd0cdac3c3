//! Period-keyed store with bounded retention
//!
//! Each key owns an ordered map of period -> record. After every write the
//! map is trimmed to the `retention` most recent periods (relative to the
//! newest period written for that key), so memory per key is bounded by
//! `retention` records no matter how long the engine runs.
//!
//! ```text
//! retention = 4, newest = #10
//!
//!   #5   #6 | #7   #8   #9   #10   (#6 and older dropped)
//!           |<----- window ----->|
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use tradeguard_core::Period;

/// Default number of periods retained per key
pub const DEFAULT_RETENTION: u64 = 256;

#[derive(Debug, Clone)]
pub struct WindowedStore<K, V> {
    retention: u64,
    entries: HashMap<K, BTreeMap<Period, V>>,
}

impl<K, V> Default for WindowedStore<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl<K, V> WindowedStore<K, V> {
    /// Create a store keeping `retention` periods per key (minimum 1)
    pub fn new(retention: u64) -> Self {
        Self {
            retention: retention.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn retention(&self) -> u64 {
        self.retention
    }
}

impl<K, V> WindowedStore<K, V>
where
    K: Eq + Hash,
{
    /// Record at (key, period), or `V::default()` if absent or expired
    pub fn get(&self, key: &K, period: Period) -> V
    where
        V: Clone + Default,
    {
        self.entries
            .get(key)
            .and_then(|series| series.get(&period))
            .cloned()
            .unwrap_or_default()
    }

    /// Insert or overwrite the record at (key, period)
    pub fn set(&mut self, key: K, period: Period, value: V) -> Option<V> {
        let series = self.entries.entry(key).or_default();
        let previous = series.insert(period, value);
        Self::prune(series, self.retention);
        previous
    }

    /// Read-modify-write starting from the default when absent
    pub fn update<F>(&mut self, key: K, period: Period, f: F) -> V
    where
        V: Clone + Default,
        F: FnOnce(V) -> V,
    {
        let series = self.entries.entry(key).or_default();
        let next = f(series.get(&period).cloned().unwrap_or_default());
        series.insert(period, next.clone());
        Self::prune(series, self.retention);
        next
    }

    /// Most recent record strictly before `period`
    pub fn latest_before(&self, key: &K, period: Period) -> Option<(Period, &V)> {
        self.entries
            .get(key)?
            .range(..period)
            .next_back()
            .map(|(p, v)| (*p, v))
    }

    /// Retained records for `key` with `from <= period <= to`, oldest first
    pub fn range<'a>(
        &'a self,
        key: &K,
        from: Period,
        to: Period,
    ) -> impl Iterator<Item = (Period, &'a V)> + 'a {
        self.entries
            .get(key)
            .filter(|_| from <= to)
            .into_iter()
            .flat_map(move |series| series.range(from..=to))
            .map(|(p, v)| (*p, v))
    }

    /// Number of periods currently held for `key`
    pub fn retained(&self, key: &K) -> usize {
        self.entries.get(key).map(BTreeMap::len).unwrap_or(0)
    }

    fn prune(series: &mut BTreeMap<Period, V>, retention: u64) {
        let Some(newest) = series.keys().next_back().copied() else {
            return;
        };
        let cutoff = newest.saturating_sub(retention - 1);
        if series.keys().next().is_some_and(|oldest| *oldest < cutoff) {
            let kept = series.split_off(&cutoff);
            tracing::trace!(
                dropped = series.len(),
                cutoff = cutoff.height(),
                "Pruned expired periods"
            );
            *series = kept;
        }
    }
}
