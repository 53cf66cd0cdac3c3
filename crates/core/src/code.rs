//! Stable numeric error codes
//!
//! Codes are part of the public contract with the host exchange and never
//! change meaning. Policy rejections (`NotAuthorized`, `AddressFlagged`) are
//! returned as errors; the rest only appear as triggered signals in a risk
//! report.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    /// Caller is not the engine owner
    NotAuthorized = 100,
    /// Sender carries a flag record
    AddressFlagged = 101,
    /// Too many transactions in the current period
    RateLimitExceeded = 102,
    /// Wash-trading score at or above threshold
    SuspiciousActivity = 103,
    /// Price moved beyond the deviation threshold on meaningful volume
    PriceManipulation = 104,
}

impl ErrorCode {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Look up a code by its numeric value
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            100 => Some(ErrorCode::NotAuthorized),
            101 => Some(ErrorCode::AddressFlagged),
            102 => Some(ErrorCode::RateLimitExceeded),
            103 => Some(ErrorCode::SuspiciousActivity),
            104 => Some(ErrorCode::PriceManipulation),
            _ => None,
        }
    }

    /// Hard aborts reject the operation; the rest are advisory
    pub fn is_hard_abort(self) -> bool {
        matches!(self, ErrorCode::NotAuthorized | ErrorCode::AddressFlagged)
    }
}
