//! Period - discrete execution step (block height)
//!
//! The host supplies the current period with every call. State keyed by
//! period is append-only: the engine rejects events for a period older than
//! the newest one it has committed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block height (or any monotonic step index) used to key history
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Period(u64);

impl Period {
    pub const GENESIS: Self = Self(0);

    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    pub const fn height(&self) -> u64 {
        self.0
    }

    /// Period `n` steps earlier, floored at genesis
    pub fn saturating_sub(&self, n: u64) -> Self {
        Self(self.0.saturating_sub(n))
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for Period {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
