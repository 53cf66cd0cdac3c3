//! Pre-trade gate - runs BEFORE the exchange executes a trade
//!
//! ```text
//! ScreenRequest
//!      │
//!      ▼
//! analyze_fraud_risk ──► BLOCK_TRANSACTION ──► GateOutcome::Block
//!      │
//!      ├──► REVIEW ──► GateOutcome::Warn
//!      │
//!      ▼
//! GateOutcome::Proceed
//! ```
//!
//! The gate only reads; hosts report the executed trade afterwards through
//! `record_trade`.

use async_trait::async_trait;
use tradeguard_core::Period;

use crate::aggregator::AnalysisRequest;
use crate::error::EngineResult;
use crate::report::{Recommendation, RiskReport};
use crate::shared::SharedEngine;

/// Trade awaiting execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenRequest {
    pub period: Period,
    pub request: AnalysisRequest,
}

/// Decision from the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Execute the trade
    Proceed,
    /// Execute, but surface the report for review
    Warn(RiskReport),
    /// Do not execute
    Block(RiskReport),
}

impl GateOutcome {
    /// Outcome for a finished report
    pub fn from_report(report: RiskReport) -> Self {
        match report.recommendation {
            Recommendation::Allow => GateOutcome::Proceed,
            Recommendation::Review => GateOutcome::Warn(report),
            Recommendation::BlockTransaction => GateOutcome::Block(report),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, GateOutcome::Block(_))
    }

    pub fn report(&self) -> Option<&RiskReport> {
        match self {
            GateOutcome::Proceed => None,
            GateOutcome::Warn(report) | GateOutcome::Block(report) => Some(report),
        }
    }
}

/// Screening seam for exchange integrations
#[async_trait]
pub trait PreTradeGate: Send + Sync {
    /// Gate name for logging
    fn name(&self) -> &str;

    async fn screen(&self, request: &ScreenRequest) -> EngineResult<GateOutcome>;
}

#[async_trait]
impl PreTradeGate for SharedEngine {
    fn name(&self) -> &str {
        "fraud_engine"
    }

    async fn screen(&self, request: &ScreenRequest) -> EngineResult<GateOutcome> {
        let report = self
            .analyze_fraud_risk(request.period, &request.request)
            .await?;
        let outcome = GateOutcome::from_report(report);

        if outcome.is_blocked() {
            tracing::warn!(
                gate = self.name(),
                user = %request.request.user,
                pair = %request.request.pair,
                "Trade blocked by pre-trade gate"
            );
        }
        Ok(outcome)
    }
}
