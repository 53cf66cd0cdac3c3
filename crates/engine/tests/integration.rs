//! Integration tests for the TradeGuard fraud engine
//!
//! These tests drive the engine only through its public operations and
//! check the observable state after each step.

use tempfile::TempDir;
use tradeguard_core::{Address, BlockActivity, ErrorCode, PairId, Period};
use tradeguard_engine::{
    percentage_change, AnalysisRequest, CallContext, EngineError, FraudConfig, FraudEngine,
    Recommendation, TradeJournal, TradeOutcome, TradeRequest,
};

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

fn pair() -> PairId {
    "STX/USDA".parse().unwrap()
}

fn owner(period: u64) -> CallContext {
    CallContext::new(addr("OWNER"), Period::new(period))
}

fn as_user(user: &str, period: u64) -> CallContext {
    CallContext::new(addr(user), Period::new(period))
}

fn trade(counterparty: &str, price: u64, volume: u64) -> TradeRequest {
    TradeRequest {
        pair: pair(),
        price,
        volume,
        counterparty: addr(counterparty),
    }
}

fn analysis(user: &str, price: u64, volume: u64) -> AnalysisRequest {
    AnalysisRequest {
        user: addr(user),
        pair: pair(),
        volume,
        price,
    }
}

/// Test: U self-trades, then trades with V, in the same period
#[test]
fn test_self_trade_then_counterparty_trade() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    let ctx = as_user("U", 10);

    engine.record_trade(&ctx, &trade("U", 100, 5)).unwrap();
    let profile = engine.profile(&addr("U"), Period::new(10));
    assert_eq!(profile.wash.score, 50);
    assert_eq!(profile.wash.suspicious_pairs, 1);
    assert_eq!(profile.activity, BlockActivity { tx_count: 1, total_volume: 5 });

    engine.record_trade(&ctx, &trade("V", 100, 3)).unwrap();
    let profile = engine.profile(&addr("U"), Period::new(10));
    assert_eq!(profile.wash.score, 49);
    assert_eq!(profile.wash.suspicious_pairs, 1);
    assert_eq!(profile.activity, BlockActivity { tx_count: 2, total_volume: 8 });

    // Counterparty state is untouched
    let v = engine.profile(&addr("V"), Period::new(10));
    assert_eq!(v.activity, BlockActivity::ZERO);
    assert_eq!(v.wash.score, 0);
}

/// Test: flagged sender is rejected with ADDRESS_FLAGGED
#[test]
fn test_flagged_sender_rejected() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine
        .flag_address(&owner(1), &addr("A"), 80, "manual review")
        .unwrap();

    let before = engine.profile(&addr("A"), Period::new(2));
    let err = engine
        .record_trade(&as_user("A", 2), &trade("B", 100, 5))
        .unwrap_err();

    assert!(matches!(err, EngineError::AddressFlagged { .. }));
    assert_eq!(err.code(), Some(ErrorCode::AddressFlagged));
    assert_eq!(engine.profile(&addr("A"), Period::new(2)), before);
    assert!(engine.prices().latest_before(&pair(), Period::new(3)).is_none());

    let flag = before.flag.unwrap();
    assert_eq!(flag.risk_score, 80);
    assert_eq!(flag.reason.as_str(), "manual review");
    assert_eq!(flag.flagged_at, Period::new(1));
}

/// Test: disabled detection accepts trades without recording them
#[test]
fn test_disabled_detection_records_nothing() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    assert!(!engine.toggle_fraud_detection(&owner(1)).unwrap());

    for period in 2..6 {
        let outcome = engine
            .record_trade(&as_user("U", period), &trade("U", 100, 5))
            .unwrap();
        assert_eq!(outcome, TradeOutcome::Skipped);
    }

    assert_eq!(engine.activity().retained_periods(&addr("U")), 0);
    assert_eq!(engine.wash().tracked(), 0);
    assert!(engine.prices().latest_before(&pair(), Period::new(10)).is_none());

    let report = engine
        .analyze_fraud_risk(Period::new(6), &analysis("U", 100, 5))
        .unwrap();
    assert!(!report.detection_enabled);
}

/// Test: flag then unflag leaves no trace in engine state
#[test]
fn test_flag_unflag_roundtrip() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine
        .record_trade(&as_user("A", 1), &trade("B", 100, 5))
        .unwrap();

    let request = analysis("A", 100, 5);
    let report_before = engine.analyze_fraud_risk(Period::new(2), &request).unwrap();
    let profile_before = engine.profile(&addr("A"), Period::new(1));

    engine
        .flag_address(&owner(2), &addr("A"), 90, "investigation")
        .unwrap();
    assert!(engine.unflag_address(&owner(2), &addr("A")).unwrap());

    assert_eq!(
        engine.analyze_fraud_risk(Period::new(2), &request).unwrap(),
        report_before
    );
    assert_eq!(engine.profile(&addr("A"), Period::new(1)), profile_before);
    assert_eq!(engine.admin().flagged_count(), 0);
}

/// Test: two toggles restore the initial switch
#[test]
fn test_double_toggle_restores_enabled() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));

    assert!(!engine.toggle_fraud_detection(&owner(1)).unwrap());
    assert!(engine.toggle_fraud_detection(&owner(2)).unwrap());
    assert!(engine.admin().is_enabled());
}

/// Test: ownership transfer moves every admin right
#[test]
fn test_ownership_transfer() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine.set_contract_owner(&owner(1), &addr("NEW")).unwrap();

    assert_eq!(engine.admin().owner(), &addr("NEW"));
    assert!(matches!(
        engine.toggle_fraud_detection(&owner(2)),
        Err(EngineError::NotAuthorized { .. })
    ));
    assert!(!engine
        .toggle_fraud_detection(&as_user("NEW", 2))
        .unwrap());
}

#[test]
fn test_percentage_change_properties() {
    for x in [0, 1, 100, u64::MAX] {
        assert_eq!(percentage_change(0, x), 0);
    }
    assert_eq!(percentage_change(100, 110), 1_000);
    assert_eq!(percentage_change(110, 100), 909);
    assert_eq!(percentage_change(3, 4), 3_333);
    assert_eq!(percentage_change(7, 7), 0);
}

/// Test: sharp price move on meaningful volume is reported as manipulation
#[test]
fn test_price_manipulation_signal() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine
        .record_trade(&as_user("M", 1), &trade("N", 100, 2_000_000))
        .unwrap();

    // 10% move, above default 5% limit, above minimum volume
    let report = engine
        .analyze_fraud_risk(Period::new(2), &analysis("X", 110, 2_000_000))
        .unwrap();
    assert!(report.signals.price_manipulation);
    assert_eq!(report.metrics.price_change_bps, 1_000);
    assert_eq!(report.metrics.prior_price, Some(100));
    assert_eq!(report.metrics.prior_period, Some(Period::new(1)));
    assert_eq!(report.risk_score, 30);
    assert_eq!(report.recommendation, Recommendation::Review);
    assert_eq!(report.triggered, vec![ErrorCode::PriceManipulation]);

    // Same move on thin volume is ignored
    let thin = engine
        .analyze_fraud_risk(Period::new(2), &analysis("X", 110, 10))
        .unwrap();
    assert!(!thin.signals.price_manipulation);
    assert_eq!(thin.recommendation, Recommendation::Allow);

    // Same-period samples are not a baseline
    let same_period = engine
        .analyze_fraud_risk(Period::new(1), &analysis("X", 110, 2_000_000))
        .unwrap();
    assert!(!same_period.signals.price_manipulation);
    assert_eq!(same_period.metrics.prior_price, None);
}

/// Test: repeated self-trading crosses the wash threshold
#[test]
fn test_wash_trading_signal() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine
        .record_trade(&as_user("W", 1), &trade("W", 100, 1))
        .unwrap();
    engine
        .record_trade(&as_user("W", 2), &trade("W", 100, 1))
        .unwrap();

    let report = engine
        .analyze_fraud_risk(Period::new(3), &analysis("W", 100, 1))
        .unwrap();
    assert!(report.signals.wash_suspicious);
    assert_eq!(report.metrics.wash_score, 100);
    assert_eq!(report.metrics.suspicious_pairs, 2);
    assert_eq!(report.recommendation, Recommendation::Review);
    assert_eq!(report.triggered, vec![ErrorCode::SuspiciousActivity]);
}

/// Test: rate limit and large transaction combine into REVIEW
#[test]
fn test_rate_limit_and_large_transaction() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    for _ in 0..10 {
        engine
            .record_trade(&as_user("R", 3), &trade("S", 100, 1))
            .unwrap();
    }

    let small = engine
        .analyze_fraud_risk(Period::new(3), &analysis("R", 100, 1))
        .unwrap();
    assert!(small.signals.rate_limited);
    assert_eq!(small.metrics.tx_count, 10);
    assert_eq!(small.risk_score, 20);
    assert_eq!(small.recommendation, Recommendation::Allow);
    assert_eq!(small.triggered, vec![ErrorCode::RateLimitExceeded]);

    let large = engine
        .analyze_fraud_risk(Period::new(3), &analysis("R", 100, 2_000_000_000))
        .unwrap();
    assert!(large.signals.large_transaction);
    assert!(!large.signals.cooldown_active);
    assert_eq!(large.risk_score, 30);
    assert_eq!(large.recommendation, Recommendation::Review);

    // Next period: counter starts over
    let next = engine
        .analyze_fraud_risk(Period::new(4), &analysis("R", 100, 1))
        .unwrap();
    assert!(!next.signals.rate_limited);
}

/// Test: a second large trade inside the cooldown window
#[test]
fn test_cooldown_after_large_trade() {
    let mut engine = FraudEngine::in_memory(addr("OWNER"));
    engine
        .record_trade(&as_user("C", 5), &trade("D", 100, 2_000_000_000))
        .unwrap();

    let inside = engine
        .analyze_fraud_risk(Period::new(8), &analysis("C", 100, 2_000_000_000))
        .unwrap();
    assert!(inside.signals.cooldown_active);
    assert_eq!(inside.metrics.recent_volume, 2_000_000_000);
    assert_eq!(inside.risk_score, 20);
    assert_eq!(inside.triggered, vec![ErrorCode::RateLimitExceeded]);

    let outside = engine
        .analyze_fraud_risk(Period::new(16), &analysis("C", 100, 2_000_000_000))
        .unwrap();
    assert!(!outside.signals.cooldown_active);
    assert_eq!(outside.metrics.recent_volume, 0);
}

/// Test: old periods fall out of the retention window
#[test]
fn test_retention_bounds_history() {
    let mut config = FraudConfig::default();
    config.retention_periods = 4;
    config.thresholds.cooldown_periods = 2;

    let mut engine = FraudEngine::new(config, addr("OWNER"));
    for period in 1..=10 {
        engine
            .record_trade(&as_user("U", period), &trade("V", 100 + period, 1))
            .unwrap();
    }

    assert_eq!(engine.activity().retained_periods(&addr("U")), 4);
    assert_eq!(engine.activity().get(&addr("U"), Period::new(6)), BlockActivity::ZERO);
    assert_eq!(engine.activity().get(&addr("U"), Period::new(7)).tx_count, 1);
    assert_eq!(engine.prices().get(&pair(), Period::new(1)).price, 0);
    assert_eq!(engine.prices().get(&pair(), Period::new(10)).price, 110);
}

/// Test: journaled engine survives restart with identical state
#[test]
fn test_restore_from_journal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal.jsonl");

    let report_before = {
        let journal = TradeJournal::new(&path).unwrap();
        let mut engine =
            FraudEngine::create(FraudConfig::default(), addr("OWNER"), journal).unwrap();

        engine
            .record_trade(&as_user("U", 10), &trade("U", 100, 5))
            .unwrap();
        engine
            .record_trade(&as_user("U", 10), &trade("V", 104, 3))
            .unwrap();
        engine
            .flag_address(&owner(11), &addr("A"), 80, "manual review")
            .unwrap();
        engine.set_contract_owner(&owner(12), &addr("NEW")).unwrap();
        engine
            .toggle_fraud_detection(&as_user("NEW", 13))
            .unwrap();

        assert_eq!(engine.journal().last_sequence(), 6);
        engine
            .analyze_fraud_risk(Period::new(14), &analysis("U", 120, 5))
            .unwrap()
    };

    let journal = TradeJournal::new(&path).unwrap();
    let engine = FraudEngine::restore(FraudConfig::default(), journal).unwrap();

    assert_eq!(engine.admin().owner(), &addr("NEW"));
    assert!(!engine.admin().is_enabled());
    assert!(engine.admin().is_flagged(&addr("A")));
    assert_eq!(
        engine.profile(&addr("U"), Period::new(10)).activity,
        BlockActivity { tx_count: 2, total_volume: 8 }
    );
    assert_eq!(
        engine
            .analyze_fraud_risk(Period::new(14), &analysis("U", 120, 5))
            .unwrap(),
        report_before
    );
}

/// Test: rejected operations leave no journal record
#[test]
fn test_rejections_not_journaled() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal.jsonl");

    let journal = TradeJournal::new(&path).unwrap();
    let mut engine = FraudEngine::create(FraudConfig::default(), addr("OWNER"), journal).unwrap();
    engine
        .flag_address(&owner(1), &addr("A"), 80, "manual review")
        .unwrap();

    assert!(engine
        .record_trade(&as_user("A", 2), &trade("B", 1, 1))
        .is_err());
    assert!(engine.toggle_fraud_detection(&as_user("A", 2)).is_err());
    assert!(engine
        .flag_address(&owner(2), &addr("B"), 1, &"y".repeat(60))
        .is_err());

    let records = TradeJournal::new(&path).unwrap().read_all().unwrap();
    assert_eq!(records.len(), 2);
}

/// Test: a second create on the same journal is refused
#[test]
fn test_double_create_refused() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal.jsonl");

    FraudEngine::create(
        FraudConfig::default(),
        addr("OWNER"),
        TradeJournal::new(&path).unwrap(),
    )
    .unwrap();

    let again = FraudEngine::create(
        FraudConfig::default(),
        addr("OTHER"),
        TradeJournal::new(&path).unwrap(),
    );
    assert!(matches!(again, Err(EngineError::AlreadyInitialized(1))));
}

/// Test: a trade for a period before the newest committed one is refused,
/// including after restart
#[test]
fn test_trade_for_past_period_refused() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal.jsonl");

    let mut config = FraudConfig::default();
    config.retention_periods = 16;
    config.thresholds.cooldown_periods = 4;

    {
        let journal = TradeJournal::new(&path).unwrap();
        let mut engine = FraudEngine::create(config.clone(), addr("OWNER"), journal).unwrap();
        engine
            .record_trade(&as_user("U", 100), &trade("U", 100, 5))
            .unwrap();

        let err = engine
            .record_trade(&as_user("U", 10), &trade("U", 100, 5))
            .unwrap_err();
        assert!(matches!(err, EngineError::StalePeriod { .. }));

        let wash = engine.wash().record(&addr("U"));
        assert_eq!(wash.score, 50);
        assert_eq!(wash.suspicious_pairs, 1);
        assert_eq!(wash.last_updated, Period::new(100));
        assert_eq!(engine.journal().last_sequence(), 2);
    }

    let journal = TradeJournal::new(&path).unwrap();
    let mut engine = FraudEngine::restore(config, journal).unwrap();
    assert_eq!(engine.latest_period(), Period::new(100));
    assert!(matches!(
        engine.record_trade(&as_user("U", 99), &trade("V", 100, 1)),
        Err(EngineError::StalePeriod { .. })
    ));
    assert_eq!(
        engine
            .record_trade(&as_user("U", 101), &trade("V", 100, 1))
            .unwrap(),
        TradeOutcome::Recorded
    );
}
