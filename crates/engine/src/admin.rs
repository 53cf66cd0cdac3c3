//! Owner-authenticated control plane
//!
//! Holds the engine's owner/enabled switch and the manual flag list. Every
//! mutating operation on the engine's admin surface calls [`AdminGate::authorize`]
//! first; mutations below are only reached after the event is journaled.
//!
//! Ownership transfer is a single step with no confirmation by the new owner.

use serde::{Deserialize, Serialize};
use tradeguard_core::{Address, FlagRecord};
use tradeguard_store::KeyedStore;

use crate::error::{EngineError, EngineResult};

/// Owner and on/off switch, owned by the engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub owner: Address,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    state: EngineState,
    flags: KeyedStore<Address, FlagRecord>,
}

impl AdminGate {
    /// New gate owned by `owner`, detection enabled
    pub fn new(owner: Address) -> Self {
        Self::with_state(EngineState {
            owner,
            enabled: true,
        })
    }

    pub fn with_state(state: EngineState) -> Self {
        Self {
            state,
            flags: KeyedStore::new(),
        }
    }

    /// Fail with `NotAuthorized` unless `caller` is the owner
    pub fn authorize(&self, caller: &Address) -> EngineResult<()> {
        if *caller != self.state.owner {
            return Err(EngineError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    pub fn owner(&self) -> &Address {
        &self.state.owner
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn is_flagged(&self, address: &Address) -> bool {
        self.flags.contains(address)
    }

    pub fn flag_record(&self, address: &Address) -> Option<&FlagRecord> {
        self.flags.find(address)
    }

    pub fn flagged_count(&self) -> usize {
        self.flags.len()
    }

    /// Flagged addresses, sorted for stable output
    pub fn flagged(&self) -> Vec<(&Address, &FlagRecord)> {
        let mut flagged: Vec<_> = self.flags.iter().collect();
        flagged.sort_by(|a, b| a.0.cmp(b.0));
        flagged
    }

    pub(crate) fn set_owner(&mut self, new_owner: Address) {
        self.state.owner = new_owner;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    pub(crate) fn flag(&mut self, address: Address, record: FlagRecord) {
        self.flags.set(address, record);
    }

    pub(crate) fn unflag(&mut self, address: &Address) -> Option<FlagRecord> {
        self.flags.delete(address)
    }
}
