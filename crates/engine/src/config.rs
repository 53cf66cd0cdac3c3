//! Fraud engine configuration
//!
//! Every threshold, weight and tier boundary is a named, documented value
//! loaded from JSON. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound of the composite risk score
pub const MAX_RISK_SCORE: u32 = 100;

/// Configuration for the fraud engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudConfig {
    /// Advisory detection thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Weight of each raised signal in the composite score
    #[serde(default)]
    pub weights: RiskWeights,

    /// Score boundaries for recommendation tiers
    #[serde(default)]
    pub tiers: TierThresholds,

    /// Periods of activity and price history kept per key
    #[serde(default = "default_retention_periods")]
    pub retention_periods: u64,
}

/// Detection thresholds. None of these abort `record_trade`; they only
/// raise signals in the risk report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Transactions per address per period before the rate signal fires
    #[serde(default = "default_max_tx_per_period")]
    pub max_tx_per_period: u64,

    /// A single trade above this volume is "large"
    #[serde(default = "default_large_tx_threshold")]
    pub large_tx_threshold: u64,

    /// Price change (basis points) above which deviation is suspicious
    #[serde(default = "default_max_price_deviation_bps")]
    pub max_price_deviation_bps: u64,

    /// Deviation is only considered when volume exceeds this
    #[serde(default = "default_min_volume_for_price_check")]
    pub min_volume_for_price_check: u64,

    /// Wash score at or above which an address is suspicious
    #[serde(default = "default_wash_trading_threshold")]
    pub wash_trading_threshold: u64,

    /// Periods after large volume during which another large trade is flagged
    #[serde(default = "default_cooldown_periods")]
    pub cooldown_periods: u64,
}

/// Weight table for the composite score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskWeights {
    #[serde(default = "default_weight_flagged")]
    pub flagged: u32,
    #[serde(default = "default_weight_wash_trading")]
    pub wash_trading: u32,
    #[serde(default = "default_weight_price_manipulation")]
    pub price_manipulation: u32,
    #[serde(default = "default_weight_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_weight_large_transaction")]
    pub large_transaction: u32,
    #[serde(default = "default_weight_cooldown")]
    pub cooldown: u32,
}

/// Score-to-recommendation boundaries (inclusive lower bounds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Scores at or above this are REVIEW
    #[serde(default = "default_tier_review")]
    pub review: u32,
    /// Scores at or above this are BLOCK_TRANSACTION
    #[serde(default = "default_tier_block")]
    pub block: u32,
}

// Default value functions for serde
fn default_retention_periods() -> u64 {
    256
}

fn default_max_tx_per_period() -> u64 {
    10
}

fn default_large_tx_threshold() -> u64 {
    1_000_000_000
}

fn default_max_price_deviation_bps() -> u64 {
    500 // 5%
}

fn default_min_volume_for_price_check() -> u64 {
    1_000_000
}

fn default_wash_trading_threshold() -> u64 {
    80
}

fn default_cooldown_periods() -> u64 {
    10
}

fn default_weight_flagged() -> u32 {
    70
}

fn default_weight_wash_trading() -> u32 {
    30
}

fn default_weight_price_manipulation() -> u32 {
    30
}

fn default_weight_rate_limit() -> u32 {
    20
}

fn default_weight_large_transaction() -> u32 {
    10
}

fn default_weight_cooldown() -> u32 {
    10
}

fn default_tier_review() -> u32 {
    30
}

fn default_tier_block() -> u32 {
    70
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_tx_per_period: default_max_tx_per_period(),
            large_tx_threshold: default_large_tx_threshold(),
            max_price_deviation_bps: default_max_price_deviation_bps(),
            min_volume_for_price_check: default_min_volume_for_price_check(),
            wash_trading_threshold: default_wash_trading_threshold(),
            cooldown_periods: default_cooldown_periods(),
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            flagged: default_weight_flagged(),
            wash_trading: default_weight_wash_trading(),
            price_manipulation: default_weight_price_manipulation(),
            rate_limit: default_weight_rate_limit(),
            large_transaction: default_weight_large_transaction(),
            cooldown: default_weight_cooldown(),
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            review: default_tier_review(),
            block: default_tier_block(),
        }
    }
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            weights: RiskWeights::default(),
            tiers: TierThresholds::default(),
            retention_periods: default_retention_periods(),
        }
    }
}

impl FraudConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: FraudConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce coherent reports
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_periods == 0 {
            return Err(ConfigError::Invalid(
                "retention_periods must be at least 1".to_string(),
            ));
        }
        if self.thresholds.max_tx_per_period == 0 {
            return Err(ConfigError::Invalid(
                "max_tx_per_period must be at least 1".to_string(),
            ));
        }
        if self.thresholds.cooldown_periods >= self.retention_periods {
            return Err(ConfigError::Invalid(format!(
                "cooldown_periods ({}) must be shorter than retention_periods ({})",
                self.thresholds.cooldown_periods, self.retention_periods
            )));
        }
        let tiers = &self.tiers;
        if tiers.review == 0 || tiers.review > tiers.block || tiers.block > MAX_RISK_SCORE {
            return Err(ConfigError::Invalid(format!(
                "tiers must satisfy 0 < review ({}) <= block ({}) <= {}",
                tiers.review, tiers.block, MAX_RISK_SCORE
            )));
        }
        Ok(())
    }
}
