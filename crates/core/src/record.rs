//! Stored records
//!
//! Every record has a documented zero value returned for absent keys, so
//! readers never handle a missing entry ad hoc.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::period::Period;

/// Maximum flag reason length in bytes
pub const MAX_REASON_BYTES: usize = 50;

/// Per-address, per-period activity.
///
/// Zero value: `{ tx_count: 0, total_volume: 0 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockActivity {
    pub tx_count: u64,
    pub total_volume: u64,
}

impl BlockActivity {
    pub const ZERO: Self = Self {
        tx_count: 0,
        total_volume: 0,
    };

    /// Activity after one more trade of `volume`
    pub fn with_trade(self, volume: u64) -> Self {
        Self {
            tx_count: self.tx_count.saturating_add(1),
            total_volume: self.total_volume.saturating_add(volume),
        }
    }
}

/// Per-pair, per-period price sample.
///
/// Zero value: `{ price: 0, volume: 0 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: u64,
    pub volume: u64,
}

/// Per-address wash-trading suspicion.
///
/// Zero value: score 0, never updated (genesis), no suspicious pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WashScore {
    pub score: u64,
    pub last_updated: Period,
    pub suspicious_pairs: u64,
}

/// Errors that can occur when building a flag reason
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasonError {
    #[error("Flag reason too long: {len} bytes (max {max})", max = MAX_REASON_BYTES)]
    TooLong { len: usize },
}

/// Bounded free-text reason attached to a flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagReason(String);

impl FlagReason {
    pub fn new(reason: impl Into<String>) -> Result<Self, ReasonError> {
        let reason = reason.into();
        if reason.len() > MAX_REASON_BYTES {
            return Err(ReasonError::TooLong { len: reason.len() });
        }
        Ok(Self(reason))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FlagReason {
    type Error = ReasonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FlagReason> for String {
    fn from(reason: FlagReason) -> Self {
        reason.0
    }
}

/// Manual flag placed by the owner. Presence means "flagged".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub risk_score: u32,
    pub flagged_at: Period,
    pub reason: FlagReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(BlockActivity::default(), BlockActivity::ZERO);
        assert_eq!(PricePoint::default(), PricePoint { price: 0, volume: 0 });

        let wash = WashScore::default();
        assert_eq!(wash.score, 0);
        assert_eq!(wash.suspicious_pairs, 0);
        assert_eq!(wash.last_updated, Period::GENESIS);
    }

    #[test]
    fn test_activity_with_trade() {
        let activity = BlockActivity::ZERO.with_trade(5).with_trade(3);
        assert_eq!(activity.tx_count, 2);
        assert_eq!(activity.total_volume, 8);
    }

    #[test]
    fn test_activity_saturates() {
        let activity = BlockActivity {
            tx_count: u64::MAX,
            total_volume: u64::MAX - 1,
        }
        .with_trade(10);
        assert_eq!(activity.tx_count, u64::MAX);
        assert_eq!(activity.total_volume, u64::MAX);
    }

    #[test]
    fn test_reason_bound() {
        assert!(FlagReason::new("manual review").is_ok());
        assert!(FlagReason::new("x".repeat(MAX_REASON_BYTES)).is_ok());
        assert_eq!(
            FlagReason::new("x".repeat(MAX_REASON_BYTES + 1)),
            Err(ReasonError::TooLong { len: 51 })
        );
    }

    #[test]
    fn test_reason_bound_counts_bytes() {
        // 17 three-byte characters = 51 bytes
        let reason = "€".repeat(17);
        assert!(FlagReason::new(reason).is_err());
    }

    #[test]
    fn test_flag_record_serde_rejects_long_reason() {
        let json = format!(
            r#"{{"risk_score":80,"flagged_at":3,"reason":"{}"}}"#,
            "x".repeat(60)
        );
        assert!(serde_json::from_str::<FlagRecord>(&json).is_err());
    }
}
