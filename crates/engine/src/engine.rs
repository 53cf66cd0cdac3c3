//! Fraud Engine - Main orchestrator
//!
//! Every mutating operation follows the same flow:
//!
//! ```text
//! checks (enabled / authorize / flagged / input / period not in the past)
//!        │ any failure: abort, nothing written
//!        ▼
//! journal.append(event)
//!        │ failure: abort, nothing applied
//!        ▼
//! apply(event)  ── infallible, updates all components together
//! ```
//!
//! Operations take `&mut self`, so one engine instance applies one
//! transaction at a time. Async hosts share it through
//! [`crate::shared::SharedEngine`].

use serde::{Deserialize, Serialize};
use tradeguard_core::{Address, BlockActivity, FlagReason, FlagRecord, PairId, Period, WashScore};

use crate::activity::ActivityTracker;
use crate::admin::{AdminGate, EngineState};
use crate::aggregator::{AnalysisRequest, RiskAggregator};
use crate::config::FraudConfig;
use crate::error::{EngineError, EngineResult};
use crate::event::EngineEvent;
use crate::journal::{verify_chain, TradeJournal};
use crate::price::PriceHistory;
use crate::report::RiskReport;
use crate::wash::WashTradingScorer;

/// Who is calling, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub period: Period,
}

impl CallContext {
    pub fn new(caller: Address, period: Period) -> Self {
        Self { caller, period }
    }
}

/// An executed trade reported by the host. The sender is the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub pair: PairId,
    pub price: u64,
    pub volume: u64,
    pub counterparty: Address,
}

/// Acknowledgement of `record_trade`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOutcome {
    /// Trade written to all trackers
    Recorded,
    /// Detection disabled; nothing written
    Skipped,
}

/// Everything the engine knows about one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressProfile {
    pub address: Address,
    pub period: Period,
    pub activity: BlockActivity,
    pub wash: WashScore,
    pub flag: Option<FlagRecord>,
}

/// Main Fraud Engine
pub struct FraudEngine {
    config: FraudConfig,
    admin: AdminGate,
    activity: ActivityTracker,
    prices: PriceHistory,
    wash: WashTradingScorer,
    journal: TradeJournal,
    /// Newest period of any committed event
    latest_period: Period,
}

impl FraudEngine {
    /// Create an engine with an in-memory journal
    pub fn new(config: FraudConfig, owner: Address) -> Self {
        Self::assemble(
            config,
            EngineState {
                owner,
                enabled: true,
            },
            TradeJournal::in_memory(),
        )
    }

    /// Create an engine with default config (for testing)
    pub fn in_memory(owner: Address) -> Self {
        Self::new(FraudConfig::default(), owner)
    }

    /// Initialize a fresh journal with a genesis event owned by `owner`
    pub fn create(config: FraudConfig, owner: Address, journal: TradeJournal) -> EngineResult<Self> {
        config.validate()?;
        if journal.last_sequence() > 0 {
            return Err(EngineError::AlreadyInitialized(journal.last_sequence()));
        }

        let state = EngineState {
            owner,
            enabled: true,
        };
        let mut engine = Self::assemble(config, state.clone(), journal);
        engine.journal.append(&EngineEvent::EngineInitialized {
            owner: state.owner.clone(),
            enabled: state.enabled,
        })?;

        tracing::info!(owner = %state.owner, "Fraud engine initialized");
        Ok(engine)
    }

    /// Rebuild an engine by replaying an existing journal
    pub fn restore(config: FraudConfig, journal: TradeJournal) -> EngineResult<Self> {
        config.validate()?;

        let records = journal.read_all()?;
        verify_chain(&records)?;

        let mut records = records.into_iter();
        let state = match records.next().map(|record| record.event) {
            Some(EngineEvent::EngineInitialized { owner, enabled }) => EngineState { owner, enabled },
            _ => return Err(EngineError::NotInitialized),
        };

        let mut engine = Self::assemble(config, state, journal);
        let mut replayed = 1usize;
        for record in records {
            engine.apply(&record.event);
            replayed += 1;
        }

        tracing::info!(
            replayed,
            owner = %engine.admin.owner(),
            enabled = engine.admin.is_enabled(),
            "Fraud engine restored from journal"
        );
        Ok(engine)
    }

    fn assemble(config: FraudConfig, state: EngineState, journal: TradeJournal) -> Self {
        let retention = config.retention_periods;
        Self {
            config,
            admin: AdminGate::with_state(state),
            activity: ActivityTracker::new(retention),
            prices: PriceHistory::new(retention),
            wash: WashTradingScorer::new(),
            journal,
            latest_period: Period::GENESIS,
        }
    }

    // === Trade path ===

    /// Record an executed trade sent by `ctx.caller`
    ///
    /// 1. detection disabled: succeed, write nothing
    /// 2. sender flagged: fail with `AddressFlagged`
    /// 3. period older than the latest committed one: fail with `StalePeriod`
    /// 4. write price, activity and wash score as one unit
    pub fn record_trade(&mut self, ctx: &CallContext, trade: &TradeRequest) -> EngineResult<TradeOutcome> {
        if !self.admin.is_enabled() {
            tracing::debug!(sender = %ctx.caller, "Detection disabled, trade not recorded");
            return Ok(TradeOutcome::Skipped);
        }

        if self.admin.is_flagged(&ctx.caller) {
            tracing::warn!(
                sender = %ctx.caller,
                pair = %trade.pair,
                period = ctx.period.height(),
                "Rejected trade from flagged address"
            );
            return Err(EngineError::AddressFlagged {
                address: ctx.caller.clone(),
            });
        }

        if trade.pair.is_degenerate() {
            return Err(EngineError::InvalidPair(trade.pair.clone()));
        }

        self.commit(EngineEvent::TradeRecorded {
            period: ctx.period,
            sender: ctx.caller.clone(),
            counterparty: trade.counterparty.clone(),
            pair: trade.pair.clone(),
            price: trade.price,
            volume: trade.volume,
        })?;

        Ok(TradeOutcome::Recorded)
    }

    /// Assess a prospective trade as of `period`. Reads only.
    pub fn analyze_fraud_risk(&self, period: Period, request: &AnalysisRequest) -> EngineResult<RiskReport> {
        if request.pair.is_degenerate() {
            return Err(EngineError::InvalidPair(request.pair.clone()));
        }
        Ok(self.aggregator().analyze(period, request))
    }

    // === Admin path ===

    /// Flag `address` (replacing any existing flag). Owner only.
    pub fn flag_address(
        &mut self,
        ctx: &CallContext,
        address: &Address,
        risk_score: u32,
        reason: &str,
    ) -> EngineResult<()> {
        self.admin.authorize(&ctx.caller)?;
        let reason = FlagReason::new(reason)?;

        self.commit(EngineEvent::AddressFlagged {
            period: ctx.period,
            caller: ctx.caller.clone(),
            address: address.clone(),
            risk_score,
            reason,
        })?;

        tracing::info!(address = %address, risk_score, "Address flagged");
        Ok(())
    }

    /// Remove the flag on `address`. Owner only.
    ///
    /// Returns whether a flag was present; unflagging a clean address
    /// succeeds and writes nothing.
    pub fn unflag_address(&mut self, ctx: &CallContext, address: &Address) -> EngineResult<bool> {
        self.admin.authorize(&ctx.caller)?;
        if !self.admin.is_flagged(address) {
            return Ok(false);
        }

        self.commit(EngineEvent::AddressUnflagged {
            period: ctx.period,
            caller: ctx.caller.clone(),
            address: address.clone(),
        })?;

        tracing::info!(address = %address, "Address unflagged");
        Ok(true)
    }

    /// Flip the enabled switch. Owner only. Returns the new value.
    pub fn toggle_fraud_detection(&mut self, ctx: &CallContext) -> EngineResult<bool> {
        self.admin.authorize(&ctx.caller)?;
        let enabled = !self.admin.is_enabled();

        self.commit(EngineEvent::DetectionToggled {
            period: ctx.period,
            caller: ctx.caller.clone(),
            enabled,
        })?;

        tracing::info!(enabled, "Fraud detection toggled");
        Ok(enabled)
    }

    /// Hand ownership to `new_owner` in one step. Owner only.
    pub fn set_contract_owner(&mut self, ctx: &CallContext, new_owner: &Address) -> EngineResult<()> {
        self.admin.authorize(&ctx.caller)?;

        self.commit(EngineEvent::OwnershipTransferred {
            period: ctx.period,
            previous_owner: ctx.caller.clone(),
            new_owner: new_owner.clone(),
        })?;

        tracing::warn!(
            previous_owner = %ctx.caller,
            new_owner = %new_owner,
            "Engine ownership transferred"
        );
        Ok(())
    }

    // === Commit ===

    fn commit(&mut self, event: EngineEvent) -> EngineResult<()> {
        if let Some(period) = event.period() {
            if period < self.latest_period {
                tracing::warn!(
                    period = period.height(),
                    latest = self.latest_period.height(),
                    kind = event.kind(),
                    "Rejected event for a past period"
                );
                return Err(EngineError::StalePeriod {
                    period,
                    latest: self.latest_period,
                });
            }
        }

        let record = self.journal.append(&event)?;
        tracing::debug!(sequence = record.sequence, kind = event.kind(), "Event committed");
        self.apply(&event);
        Ok(())
    }

    /// Sole mutator of component state, shared by live commits and replay
    fn apply(&mut self, event: &EngineEvent) {
        if let Some(period) = event.period() {
            self.latest_period = self.latest_period.max(period);
        }

        match event {
            EngineEvent::EngineInitialized { owner, enabled } => {
                self.admin = AdminGate::with_state(EngineState {
                    owner: owner.clone(),
                    enabled: *enabled,
                });
            }
            EngineEvent::TradeRecorded {
                period,
                sender,
                counterparty,
                pair,
                price,
                volume,
            } => {
                self.prices.record(pair, *period, *price, *volume);
                self.activity.record(sender, *period, *volume);
                self.wash.update(sender, counterparty, *period);
            }
            EngineEvent::AddressFlagged {
                period,
                address,
                risk_score,
                reason,
                ..
            } => {
                self.admin.flag(
                    address.clone(),
                    FlagRecord {
                        risk_score: *risk_score,
                        flagged_at: *period,
                        reason: reason.clone(),
                    },
                );
            }
            EngineEvent::AddressUnflagged { address, .. } => {
                self.admin.unflag(address);
            }
            EngineEvent::DetectionToggled { enabled, .. } => {
                self.admin.set_enabled(*enabled);
            }
            EngineEvent::OwnershipTransferred { new_owner, .. } => {
                self.admin.set_owner(new_owner.clone());
            }
        }
    }

    // === Queries ===

    fn aggregator(&self) -> RiskAggregator<'_> {
        RiskAggregator {
            config: &self.config,
            admin: &self.admin,
            activity: &self.activity,
            prices: &self.prices,
            wash: &self.wash,
        }
    }

    /// Activity, wash score and flag for `address` as of `period`
    pub fn profile(&self, address: &Address, period: Period) -> AddressProfile {
        AddressProfile {
            address: address.clone(),
            period,
            activity: self.activity.get(address, period),
            wash: self.wash.record(address),
            flag: self.admin.flag_record(address).cloned(),
        }
    }

    pub fn config(&self) -> &FraudConfig {
        &self.config
    }

    pub fn admin(&self) -> &AdminGate {
        &self.admin
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    pub fn prices(&self) -> &PriceHistory {
        &self.prices
    }

    pub fn wash(&self) -> &WashTradingScorer {
        &self.wash
    }

    pub fn journal(&self) -> &TradeJournal {
        &self.journal
    }

    /// Newest period any committed event was written for
    pub fn latest_period(&self) -> Period {
        self.latest_period
    }
}
