//! Engine events (written to the journal)
//!
//! One event per committed state change. Replaying the events in order
//! against the same configuration rebuilds identical engine state.

use serde::{Deserialize, Serialize};
use tradeguard_core::{Address, FlagReason, PairId, Period};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Genesis: first record of every journal
    EngineInitialized { owner: Address, enabled: bool },

    /// Trade accepted by `record_trade`
    TradeRecorded {
        period: Period,
        sender: Address,
        counterparty: Address,
        pair: PairId,
        price: u64,
        volume: u64,
    },

    /// Manual flag placed (or replaced) by the owner
    AddressFlagged {
        period: Period,
        caller: Address,
        address: Address,
        risk_score: u32,
        reason: FlagReason,
    },

    /// Manual flag removed by the owner
    AddressUnflagged {
        period: Period,
        caller: Address,
        address: Address,
    },

    /// Detection switched on or off
    DetectionToggled {
        period: Period,
        caller: Address,
        enabled: bool,
    },

    /// Ownership handed to a new address
    OwnershipTransferred {
        period: Period,
        previous_owner: Address,
        new_owner: Address,
    },
}

impl EngineEvent {
    /// Short name for logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::EngineInitialized { .. } => "engine_initialized",
            EngineEvent::TradeRecorded { .. } => "trade_recorded",
            EngineEvent::AddressFlagged { .. } => "address_flagged",
            EngineEvent::AddressUnflagged { .. } => "address_unflagged",
            EngineEvent::DetectionToggled { .. } => "detection_toggled",
            EngineEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }

    /// Period the event was committed in (genesis has none)
    pub fn period(&self) -> Option<Period> {
        match self {
            EngineEvent::EngineInitialized { .. } => None,
            EngineEvent::TradeRecorded { period, .. }
            | EngineEvent::AddressFlagged { period, .. }
            | EngineEvent::AddressUnflagged { period, .. }
            | EngineEvent::DetectionToggled { period, .. }
            | EngineEvent::OwnershipTransferred { period, .. } => Some(*period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_recorded_serialization() {
        let event = EngineEvent::TradeRecorded {
            period: Period::new(10),
            sender: Address::new("U").unwrap(),
            counterparty: Address::new("V").unwrap(),
            pair: "STX/USDA".parse().unwrap(),
            price: 100,
            volume: 5,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"trade_recorded\""));
        assert!(json.contains("\"period\":10"));

        let parsed: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.kind(), "trade_recorded");
        assert_eq!(parsed.period(), Some(Period::new(10)));
    }

    #[test]
    fn test_flag_event_rejects_long_reason_on_read() {
        let json = format!(
            r#"{{"event_type":"address_flagged","period":1,"caller":"O","address":"A","risk_score":80,"reason":"{}"}}"#,
            "x".repeat(51)
        );
        assert!(serde_json::from_str::<EngineEvent>(&json).is_err());
    }

    #[test]
    fn test_genesis_has_no_period() {
        let event = EngineEvent::EngineInitialized {
            owner: Address::new("OWNER").unwrap(),
            enabled: true,
        };
        assert_eq!(event.period(), None);
        assert_eq!(event.kind(), "engine_initialized");
    }
}
