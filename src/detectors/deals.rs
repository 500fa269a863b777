//! Deal-pipeline staleness detector.
//!
//! A non-terminal deal that has not seen analysis work inside the staleness
//! window needs a nudge: fresh comparables while still analyzing, a
//! contingency review once under contract. Deals are processed independently
//! in input order.

use crate::context::AnticipationContext;
use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity, Signal, SignalType};
use crate::types::{Deal, DealStatus};

/// Days without analysis before a non-terminal deal counts as stale.
pub const STALE_DEAL_DAYS: i64 = 7;

/// Provenance string carried on every signal from this detector.
pub const SOURCE: &str = "deal-pipeline-detector";

pub fn detect_stale_deals(ctx: &AnticipationContext) -> Vec<Signal> {
    let mut signals = Vec::new();

    for deal in &ctx.deals {
        if deal.status.is_terminal() {
            continue;
        }

        // Policy: a deal that has never been analyzed is always eligible
        // once it is in the pipeline (see DESIGN.md).
        let age_days = deal.last_analysis_at.map(|ts| (ctx.now - ts).num_days());
        let stale = match age_days {
            Some(days) => days > STALE_DEAL_DAYS,
            None => true,
        };
        if !stale {
            continue;
        }

        let age_text = match age_days {
            Some(days) => format!("has not been analyzed in {} days", days),
            None => "has never been analyzed".to_string(),
        };

        let (severity, title, suggested_action) = match deal.status {
            DealStatus::Analyzing => (
                Severity::Attention,
                format!("Stale Deal: {}", deal.address),
                "Run fresh comparables to confirm the numbers still hold.",
            ),
            DealStatus::UnderContract => (
                Severity::Urgent,
                format!("Under-Contract Deal Needs Analysis: {}", deal.address),
                "Review contingencies and closing deadlines before they lapse.",
            ),
            // is_terminal() filtered these above
            DealStatus::Closed | DealStatus::Dead => continue,
        };

        signals.push(Signal {
            id: new_signal_id(),
            signal_type: SignalType::DealUpdate,
            severity,
            domain: LifeDomain::BusinessRe,
            source: SOURCE.to_string(),
            title,
            context: format!("Deal is {} and {}.", deal.status.label(), age_text),
            suggested_action: Some(suggested_action.to_string()),
            auto_actionable: false,
            is_dismissed: false,
            is_acted_on: false,
            related_entity_ids: vec![deal.id.clone()],
            created_at: iso_millis(ctx.now),
            expires_at: None,
        });
    }

    signals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
