//! Risk aggregation - read-only combination of all signals
//!
//! ## Weight table (defaults, see [`RiskWeights`])
//!
//! | signal               | weight | code                  |
//! |----------------------|--------|-----------------------|
//! | flagged              | 70     | `ADDRESS_FLAGGED`     |
//! | wash_suspicious      | 30     | `SUSPICIOUS_ACTIVITY` |
//! | price_manipulation   | 30     | `PRICE_MANIPULATION`  |
//! | rate_limited         | 20     | `RATE_LIMIT_EXCEEDED` |
//! | large_transaction    | 10     | -                     |
//! | cooldown_active      | 10     | `RATE_LIMIT_EXCEEDED` |
//!
//! `risk_score = min(100, sum of raised weights)`. A flagged address scores at
//! least its manual `risk_score` (capped at 100).
//!
//! ## Tiers (defaults, see [`TierThresholds`])
//!
//! ```text
//! 0 ........ 29 | 30 ........ 69 | 70 ........ 100
//!     ALLOW     |     REVIEW     | BLOCK_TRANSACTION
//! ```
//!
//! The result depends only on engine state and the request: no clock, no
//! randomness.

use tradeguard_core::{Address, FlagRecord, PairId, Period};

use crate::activity::ActivityTracker;
use crate::admin::AdminGate;
use crate::config::{FraudConfig, RiskWeights, TierThresholds, MAX_RISK_SCORE};
use crate::price::PriceHistory;
use crate::report::{Recommendation, RiskMetrics, RiskReport, RiskSignals};
use crate::wash::WashTradingScorer;

/// Trade being assessed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub user: Address,
    pub pair: PairId,
    pub volume: u64,
    pub price: u64,
}

/// Borrowed view over engine state
pub struct RiskAggregator<'a> {
    pub config: &'a FraudConfig,
    pub admin: &'a AdminGate,
    pub activity: &'a ActivityTracker,
    pub prices: &'a PriceHistory,
    pub wash: &'a WashTradingScorer,
}

impl<'a> RiskAggregator<'a> {
    /// Assess `request` as of `period`
    pub fn analyze(&self, period: Period, request: &AnalysisRequest) -> RiskReport {
        let thresholds = &self.config.thresholds;
        let user = &request.user;

        let flag = self.admin.flag_record(user).cloned();
        let activity = self.activity.get(user, period);
        let recent_volume = self.activity.volume_between(
            user,
            period.saturating_sub(thresholds.cooldown_periods),
            period,
        );
        let wash = self.wash.record(user);
        let deviation = self.prices.deviation(
            &request.pair,
            period,
            request.price,
            request.volume,
            thresholds,
        );

        let large_transaction = request.volume > thresholds.large_tx_threshold;
        let signals = RiskSignals {
            flagged: flag.is_some(),
            rate_limited: activity.tx_count >= thresholds.max_tx_per_period,
            large_transaction,
            cooldown_active: large_transaction && recent_volume > thresholds.large_tx_threshold,
            wash_suspicious: self.wash.is_suspicious(user, thresholds.wash_trading_threshold),
            price_manipulation: deviation.suspected,
        };

        let risk_score = composite_score(&signals, &self.config.weights, flag.as_ref());
        let recommendation = tier_for(risk_score, &self.config.tiers);

        tracing::debug!(
            user = %user,
            pair = %request.pair,
            period = period.height(),
            risk_score,
            recommendation = %recommendation,
            "Fraud risk analyzed"
        );

        RiskReport {
            user: user.clone(),
            pair: request.pair.clone(),
            period,
            volume: request.volume,
            price: request.price,
            risk_score,
            recommendation,
            triggered: signals.codes(),
            signals,
            metrics: RiskMetrics {
                tx_count: activity.tx_count,
                period_volume: activity.total_volume,
                recent_volume,
                wash_score: wash.score,
                suspicious_pairs: wash.suspicious_pairs,
                price_change_bps: deviation.change_bps,
                prior_price: deviation.prior.map(|(_, point)| point.price),
                prior_period: deviation.prior.map(|(p, _)| p),
            },
            flag,
            detection_enabled: self.admin.is_enabled(),
        }
    }
}

/// Sum of raised weights, capped; flagged addresses floor at their manual score
pub fn composite_score(
    signals: &RiskSignals,
    weights: &RiskWeights,
    flag: Option<&FlagRecord>,
) -> u32 {
    let raised = [
        (signals.flagged, weights.flagged),
        (signals.wash_suspicious, weights.wash_trading),
        (signals.price_manipulation, weights.price_manipulation),
        (signals.rate_limited, weights.rate_limit),
        (signals.large_transaction, weights.large_transaction),
        (signals.cooldown_active, weights.cooldown),
    ];
    let sum = raised
        .iter()
        .filter(|(on, _)| *on)
        .fold(0u32, |acc, (_, weight)| acc.saturating_add(*weight));

    let floor = flag.map(|record| record.risk_score).unwrap_or(0);
    sum.max(floor).min(MAX_RISK_SCORE)
}

/// Map a score onto its recommendation tier
pub fn tier_for(score: u32, tiers: &TierThresholds) -> Recommendation {
    if score >= tiers.block {
        Recommendation::BlockTransaction
    } else if score >= tiers.review {
        Recommendation::Review
    } else {
        Recommendation::Allow
    }
}
