//! Risk report types
//!
//! Recommendations are ordered by restrictiveness:
//! `Allow < Review < BlockTransaction`

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tradeguard_core::{Address, ErrorCode, FlagRecord, PairId, Period};

/// Guidance returned to the calling exchange
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Proceed with the trade
    #[default]
    Allow,
    /// Proceed, but surface a warning / queue for manual review
    Review,
    /// Do not execute the trade
    BlockTransaction,
}

/// Individual signals behind a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Address carries a manual flag
    pub flagged: bool,
    /// Current-period transaction count has reached the per-period limit
    pub rate_limited: bool,
    /// Requested volume is above the large-transaction threshold
    pub large_transaction: bool,
    /// Large transaction requested while recent volume is already large
    pub cooldown_active: bool,
    /// Wash score at or above threshold
    pub wash_suspicious: bool,
    /// Price deviates beyond threshold on meaningful volume
    pub price_manipulation: bool,
}

impl RiskSignals {
    /// Stable codes for the raised signals, deduplicated and ordered
    pub fn codes(&self) -> Vec<ErrorCode> {
        let mut codes = Vec::new();
        if self.flagged {
            codes.push(ErrorCode::AddressFlagged);
        }
        if self.rate_limited || self.cooldown_active {
            codes.push(ErrorCode::RateLimitExceeded);
        }
        if self.wash_suspicious {
            codes.push(ErrorCode::SuspiciousActivity);
        }
        if self.price_manipulation {
            codes.push(ErrorCode::PriceManipulation);
        }
        codes
    }
}

/// Raw values the signals were derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Trades already recorded for the user in the analysed period
    pub tx_count: u64,
    /// Volume already recorded for the user in the analysed period
    pub period_volume: u64,
    /// Volume recorded for the user over the cooldown window
    pub recent_volume: u64,
    pub wash_score: u64,
    pub suspicious_pairs: u64,
    /// Price change against the prior sample, basis points
    pub price_change_bps: u64,
    pub prior_price: Option<u64>,
    pub prior_period: Option<Period>,
}

/// Composite assessment returned by `analyze_fraud_risk`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub user: Address,
    pub pair: PairId,
    pub period: Period,
    pub volume: u64,
    pub price: u64,
    /// Composite score, 0..=100
    pub risk_score: u32,
    pub recommendation: Recommendation,
    pub signals: RiskSignals,
    pub metrics: RiskMetrics,
    /// Stable codes for raised signals
    pub triggered: Vec<ErrorCode>,
    /// Manual flag, if the user carries one
    pub flag: Option<FlagRecord>,
    /// Whether `record_trade` is currently updating state
    pub detection_enabled: bool,
}
