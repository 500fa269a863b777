//! Portfolio day-loss detector.
//!
//! Reads the brokerage snapshot out of `mcp_data["alpaca"]` and emits at
//! most one `portfolio_alert` per cycle, tiered by the size of the day loss.
//! No snapshot, or a snapshot without a readable `dayPnl`, means no signal.

use serde_json::Value;

use crate::context::AnticipationContext;
use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity, Signal, SignalType};

/// Day P&L at or below this emits a critical alert.
pub const CRITICAL_DAY_LOSS: f64 = -500.0;
/// Day P&L at or below this (but above the critical line) emits an urgent alert.
pub const URGENT_DAY_LOSS: f64 = -100.0;

/// Provenance string carried on every signal from this detector.
pub const SOURCE: &str = "portfolio-detector";

/// Key in `mcp_data` the brokerage integration writes its snapshot under.
const SNAPSHOT_KEY: &str = "alpaca";

pub fn detect_portfolio_risk(ctx: &AnticipationContext) -> Vec<Signal> {
    let snapshot = match ctx.mcp_data.get(SNAPSHOT_KEY) {
        Some(v) => v,
        None => return Vec::new(),
    };
    let day_pnl = match snapshot.get("dayPnl").and_then(json_number) {
        Some(v) => v,
        None => return Vec::new(),
    };

    // Profits and small dips are noise.
    if day_pnl > URGENT_DAY_LOSS {
        return Vec::new();
    }

    let active_positions = snapshot
        .get("positions")
        .and_then(Value::as_array)
        .map(|positions| positions.iter().filter(|p| position_is_active(p)).count())
        .unwrap_or(0);

    let (severity, title) = if day_pnl <= CRITICAL_DAY_LOSS {
        (
            Severity::Critical,
            format!("Critical Portfolio Loss: ${:.2}", day_pnl.abs()),
        )
    } else {
        (Severity::Urgent, format!("Portfolio Loss: ${:.2}", day_pnl.abs()))
    };

    let mut context = format!(
        "Day P&L is {:.2} across {} active position(s).",
        day_pnl, active_positions
    );
    if let Some(equity) = snapshot.get("equity").and_then(json_number) {
        context.push_str(&format!(" Account equity: ${:.2}.", equity));
    }

    vec![Signal {
        id: new_signal_id(),
        signal_type: SignalType::PortfolioAlert,
        severity,
        domain: LifeDomain::Finance,
        source: SOURCE.to_string(),
        title,
        context,
        suggested_action: Some(
            "Review open positions against your risk-management limits before the next session."
                .to_string(),
        ),
        auto_actionable: false,
        is_dismissed: false,
        is_acted_on: false,
        related_entity_ids: Vec::new(),
        created_at: iso_millis(ctx.now),
        expires_at: None,
    }]
}

/// Brokerage APIs are inconsistent about numeric encoding — Alpaca returns
/// quantities as strings. Accept both.
fn json_number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// A position counts as active when its quantity is non-zero. Positions
/// without a readable quantity still count — they exist in the list.
fn position_is_active(position: &Value) -> bool {
    match position.get("qty").or_else(|| position.get("quantity")) {
        Some(qty) => json_number(qty).map(|q| q != 0.0).unwrap_or(true),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
