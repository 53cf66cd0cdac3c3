//! CLI commands

use std::path::Path;

use tradeguard_core::{Address, Period};
use tradeguard_engine::{
    read_records, verify_chain, AnalysisRequest, CallContext, GateOutcome, PreTradeGate,
    RiskReport, ScreenRequest, TradeOutcome, TradeRequest,
};

use crate::context::AppContext;

/// Initialize the engine with its genesis record
pub async fn init(ctx: &mut AppContext, owner: Address) -> Result<(), anyhow::Error> {
    ctx.initialize(owner.clone()).await?;

    println!("✅ Engine initialized (owner: {})", owner);
    Ok(())
}

/// Report an executed trade
pub async fn record_trade(
    ctx: &AppContext,
    call: &CallContext,
    trade: &TradeRequest,
) -> Result<TradeOutcome, anyhow::Error> {
    let outcome = ctx.engine()?.record_trade(call, trade).await?;

    match outcome {
        TradeOutcome::Recorded => println!(
            "✅ Recorded trade {} -> {} on {} ({} @ {}, period {})",
            call.caller, trade.counterparty, trade.pair, trade.volume, trade.price, call.period
        ),
        TradeOutcome::Skipped => println!("⏸️  Fraud detection disabled, trade not recorded"),
    }
    Ok(outcome)
}

/// Print the risk report for a prospective trade
pub async fn analyze(
    ctx: &AppContext,
    period: Period,
    request: &AnalysisRequest,
    json: bool,
) -> Result<RiskReport, anyhow::Error> {
    let report = ctx.engine()?.analyze_fraud_risk(period, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report)
}

/// Run a prospective trade through the pre-trade gate
pub async fn screen(ctx: &AppContext, request: ScreenRequest) -> Result<GateOutcome, anyhow::Error> {
    let outcome = ctx.engine()?.screen(&request).await?;

    match &outcome {
        GateOutcome::Proceed => println!("✅ Proceed"),
        GateOutcome::Warn(report) => println!(
            "⚠️  Proceed with review (score {}, triggered: {})",
            report.risk_score,
            codes(report)
        ),
        GateOutcome::Block(report) => println!(
            "⛔ Blocked (score {}, triggered: {})",
            report.risk_score,
            codes(report)
        ),
    }
    Ok(outcome)
}

/// Flag an address
pub async fn flag(
    ctx: &AppContext,
    call: &CallContext,
    address: &Address,
    risk_score: u32,
    reason: &str,
) -> Result<(), anyhow::Error> {
    ctx.engine()?
        .flag_address(call, address, risk_score, reason)
        .await?;

    println!("🚩 Flagged {} (score {}): {}", address, risk_score, reason);
    Ok(())
}

/// Remove the flag on an address
pub async fn unflag(ctx: &AppContext, call: &CallContext, address: &Address) -> Result<(), anyhow::Error> {
    if ctx.engine()?.unflag_address(call, address).await? {
        println!("✅ Unflagged {}", address);
    } else {
        println!("{} was not flagged", address);
    }
    Ok(())
}

/// Flip fraud detection on/off
pub async fn toggle(ctx: &AppContext, call: &CallContext) -> Result<bool, anyhow::Error> {
    let enabled = ctx.engine()?.toggle_fraud_detection(call).await?;

    println!(
        "✅ Fraud detection {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(enabled)
}

/// Transfer engine ownership
pub async fn set_owner(ctx: &AppContext, call: &CallContext, new_owner: &Address) -> Result<(), anyhow::Error> {
    ctx.engine()?.set_contract_owner(call, new_owner).await?;

    println!("✅ Ownership transferred {} -> {}", call.caller, new_owner);
    Ok(())
}

/// Show owner, switch and flag list
pub async fn status(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let handle = ctx.engine()?.handle();
    let engine = handle.read().await;
    let admin = engine.admin();

    println!("Owner:     {}", admin.owner());
    println!("Enabled:   {}", admin.is_enabled());
    println!("Sequence:  {}", engine.journal().last_sequence());
    println!("Retention: {} periods", engine.config().retention_periods);
    println!("Flagged:   {}", admin.flagged_count());

    for (address, record) in admin.flagged() {
        println!(
            "  {:<24} score {:>3}  period {:<8} {}",
            address.as_str(),
            record.risk_score,
            record.flagged_at.height(),
            record.reason
        );
    }
    Ok(())
}

/// Dump everything known about an address as JSON
pub async fn inspect(ctx: &AppContext, address: &Address, period: Period) -> Result<(), anyhow::Error> {
    let profile = ctx.engine()?.profile(address, period).await;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Verify the journal hash chain
///
/// Reads the file directly so a broken journal can still be audited.
pub fn audit(journal_path: &Path) -> Result<bool, anyhow::Error> {
    if !journal_path.exists() {
        println!("No journal at {}", journal_path.display());
        return Ok(false);
    }

    let records = match read_records(journal_path) {
        Ok(records) => records,
        Err(e) => {
            println!("❌ Journal unreadable: {}", e);
            return Ok(false);
        }
    };

    match verify_chain(&records) {
        Ok(()) => {
            println!("✅ Hash chain verified ({} records)", records.len());
            Ok(true)
        }
        Err(e) => {
            println!("❌ Hash chain broken: {}", e);
            Ok(false)
        }
    }
}

fn codes(report: &RiskReport) -> String {
    if report.triggered.is_empty() {
        return "none".to_string();
    }
    report
        .triggered
        .iter()
        .map(|code| code.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_report(report: &RiskReport) {
    println!(
        "Risk report for {} on {} (period {})",
        report.user, report.pair, report.period
    );
    println!("{:-<60}", "");
    println!("Recommendation: {}", report.recommendation);
    println!("Risk score:     {}", report.risk_score);
    println!("Triggered:      {}", codes(report));
    println!("{:-<60}", "");

    let signals = &report.signals;
    let metrics = &report.metrics;
    println!("flagged            {}", signals.flagged);
    println!(
        "rate_limited       {:<6} tx_count={}",
        signals.rate_limited, metrics.tx_count
    );
    println!(
        "large_transaction  {:<6} volume={}",
        signals.large_transaction, report.volume
    );
    println!(
        "cooldown_active    {:<6} recent_volume={}",
        signals.cooldown_active, metrics.recent_volume
    );
    println!(
        "wash_suspicious    {:<6} score={} self_trades={}",
        signals.wash_suspicious, metrics.wash_score, metrics.suspicious_pairs
    );
    match metrics.prior_price {
        Some(prior) => println!(
            "price_manipulation {:<6} change={}bps prior={}",
            signals.price_manipulation, metrics.price_change_bps, prior
        ),
        None => println!(
            "price_manipulation {:<6} no prior sample",
            signals.price_manipulation
        ),
    }

    if let Some(flag) = &report.flag {
        println!("{:-<60}", "");
        println!(
            "Manual flag: score {} since period {} ({})",
            flag.risk_score, flag.flagged_at, flag.reason
        );
    }
    if !report.detection_enabled {
        println!("⏸️  Fraud detection is disabled: trades are not being recorded");
    }
}
