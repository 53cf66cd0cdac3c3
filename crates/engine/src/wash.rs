//! Wash-trading suspicion score
//!
//! Self-trades raise the score sharply; every trade with a distinct
//! counterparty decays it by one, floored at zero.

use tradeguard_core::{Address, Period, WashScore};
use tradeguard_store::KeyedStore;

/// Score added for a trade where user == counterparty
pub const SELF_TRADE_PENALTY: u64 = 50;

/// Score removed for a trade with a distinct counterparty
pub const COUNTERPARTY_DECAY: u64 = 1;

#[derive(Debug, Clone, Default)]
pub struct WashTradingScorer {
    store: KeyedStore<Address, WashScore>,
}

impl WashTradingScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one trade by `user` against `counterparty` at `period`.
    ///
    /// Trade volume does not influence the score.
    pub fn update(&mut self, user: &Address, counterparty: &Address, period: Period) -> WashScore {
        let self_trade = user == counterparty;
        *self.store.update(user.clone(), |wash| {
            if self_trade {
                wash.score = wash.score.saturating_add(SELF_TRADE_PENALTY);
                wash.suspicious_pairs = wash.suspicious_pairs.saturating_add(1);
            } else {
                wash.score = wash.score.saturating_sub(COUNTERPARTY_DECAY);
            }
            wash.last_updated = period;
        })
    }

    /// Current score; 0 for unknown addresses
    pub fn get(&self, user: &Address) -> u64 {
        self.record(user).score
    }

    /// Full record; zero value for unknown addresses
    pub fn record(&self, user: &Address) -> WashScore {
        self.store.get(user)
    }

    pub fn is_suspicious(&self, user: &Address, threshold: u64) -> bool {
        self.get(user) >= threshold
    }

    /// Number of addresses with a score record
    pub fn tracked(&self) -> usize {
        self.store.len()
    }
}
