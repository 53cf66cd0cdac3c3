//! TradeGuard Fraud Engine - pre-trade risk scoring for exchanges
//!
//! Tracks per-address activity, per-pair prices and wash-trading scores,
//! and combines them into an `ALLOW` / `REVIEW` / `BLOCK_TRANSACTION`
//! recommendation. State changes are journaled and rebuilt by replay.
//!
//! ```text
//! record_trade ──► journal ──► PriceHistory + ActivityTracker + WashTradingScorer
//!
//! analyze_fraud_risk ──► RiskAggregator ──► RiskReport
//! ```

pub mod activity;
pub mod admin;
pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod gate;
pub mod journal;
pub mod price;
pub mod report;
pub mod shared;
pub mod wash;

pub use activity::ActivityTracker;
pub use admin::{AdminGate, EngineState};
pub use aggregator::{composite_score, tier_for, AnalysisRequest, RiskAggregator};
pub use config::{FraudConfig, RiskWeights, Thresholds, TierThresholds, MAX_RISK_SCORE};
pub use engine::{AddressProfile, CallContext, FraudEngine, TradeOutcome, TradeRequest};
pub use error::{ChainError, ConfigError, EngineError, EngineResult, JournalError};
pub use event::EngineEvent;
pub use gate::{GateOutcome, PreTradeGate, ScreenRequest};
pub use journal::{read_records, verify_chain, JournalRecord, TradeJournal, GENESIS_HASH};
pub use price::{percentage_change, DeviationCheck, PriceHistory, BASIS_POINTS};
pub use report::{Recommendation, RiskMetrics, RiskReport, RiskSignals};
pub use shared::SharedEngine;
pub use wash::{WashTradingScorer, COUNTERPARTY_DECAY, SELF_TRADE_PENALTY};
