//! Shared engine handle for async hosts
//!
//! Mutations take the write lock, so each one completes (journal plus all
//! trackers) before any other call observes the engine. Analyses share the
//! read lock.

use std::sync::Arc;

use tokio::sync::RwLock;
use tradeguard_core::{Address, Period};

use crate::aggregator::AnalysisRequest;
use crate::engine::{AddressProfile, CallContext, FraudEngine, TradeOutcome, TradeRequest};
use crate::error::EngineResult;
use crate::report::RiskReport;

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<FraudEngine>>,
}

impl SharedEngine {
    pub fn new(engine: FraudEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Underlying lock, for callers that need several reads under one guard
    pub fn handle(&self) -> Arc<RwLock<FraudEngine>> {
        Arc::clone(&self.inner)
    }

    pub async fn record_trade(&self, ctx: &CallContext, trade: &TradeRequest) -> EngineResult<TradeOutcome> {
        self.inner.write().await.record_trade(ctx, trade)
    }

    pub async fn analyze_fraud_risk(&self, period: Period, request: &AnalysisRequest) -> EngineResult<RiskReport> {
        self.inner.read().await.analyze_fraud_risk(period, request)
    }

    pub async fn flag_address(
        &self,
        ctx: &CallContext,
        address: &Address,
        risk_score: u32,
        reason: &str,
    ) -> EngineResult<()> {
        self.inner
            .write()
            .await
            .flag_address(ctx, address, risk_score, reason)
    }

    pub async fn unflag_address(&self, ctx: &CallContext, address: &Address) -> EngineResult<bool> {
        self.inner.write().await.unflag_address(ctx, address)
    }

    pub async fn toggle_fraud_detection(&self, ctx: &CallContext) -> EngineResult<bool> {
        self.inner.write().await.toggle_fraud_detection(ctx)
    }

    pub async fn set_contract_owner(&self, ctx: &CallContext, new_owner: &Address) -> EngineResult<()> {
        self.inner.write().await.set_contract_owner(ctx, new_owner)
    }

    pub async fn profile(&self, address: &Address, period: Period) -> AddressProfile {
        self.inner.read().await.profile(address, period)
    }

    pub async fn is_enabled(&self) -> bool {
        self.inner.read().await.admin().is_enabled()
    }
}
