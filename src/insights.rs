//! Normalizer for externally-generated AI insights.
//!
//! The engine never calls the model — it receives whatever JSON-shaped value
//! the integration hands over and hardens it at this boundary: non-lists
//! become empty, structurally invalid items are dropped, unknown enum tags
//! are defaulted, and volume is capped. Nothing in this module returns an
//! error; untrusted garbage degrades to fewer (or zero) insights.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::context::AnticipationContext;
use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity, Signal, SignalType};

/// Valid items surfaced per scan. Bounds the volume of AI-sourced noise.
pub const MAX_INSIGHTS_PER_SCAN: usize = 3;

/// How long an AI-sourced signal stays relevant before it is stale.
pub const INSIGHT_TTL_HOURS: i64 = 24;

/// Fixed provenance string for signals lowered from this normalizer.
pub const INSIGHT_SOURCE: &str = "claude-insight-engine";

/// Key in `mcp_data` the AI integration writes its raw output under.
const INSIGHTS_KEY: &str = "claudeInsights";

/// A validated insight, between normalization and lowering to a Signal.
/// Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInsight {
    pub title: String,
    pub context: String,
    pub suggested_action: Option<String>,
    pub severity: Severity,
    pub domain: LifeDomain,
}

/// Validate and default an untrusted insight payload.
///
/// Anything that is not a list — null, objects, scalars — yields an empty
/// result. An item is valid only with a non-empty `title` and a non-empty
/// `context`; invalid items are silently dropped. Order is preserved and the
/// result is capped to the first [`MAX_INSIGHTS_PER_SCAN`] valid items.
pub fn parse_claude_insights(raw: &Value) -> Vec<ParsedInsight> {
    let items = match raw.as_array() {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut parsed = Vec::new();
    for item in items {
        if parsed.len() >= MAX_INSIGHTS_PER_SCAN {
            break;
        }

        let title = match nonempty_field(item, "title") {
            Some(t) => t,
            None => {
                log::debug!("insight dropped: missing or empty title");
                continue;
            }
        };
        let context = match nonempty_field(item, "context") {
            Some(c) => c,
            None => {
                log::debug!("insight dropped: missing or empty context");
                continue;
            }
        };

        // Unknown severity is not trusted with anything above the floor.
        let severity = match item.get("severity").and_then(Value::as_str).and_then(Severity::parse) {
            Some(s) => s,
            None => Severity::Info,
        };
        // Unknown domain falls back to the catch-all.
        let domain = match item.get("domain").and_then(Value::as_str).and_then(LifeDomain::parse) {
            Some(d) => d,
            None => LifeDomain::PersonalGrowth,
        };

        let suggested_action = item
            .get("suggestedAction")
            .or_else(|| item.get("suggested_action"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        parsed.push(ParsedInsight {
            title,
            context,
            suggested_action,
            severity,
            domain,
        });
    }

    parsed
}

/// Lower parsed insights to signals. Every signal gets the fixed provenance
/// string and a 24-hour expiry; `expires_at - created_at` is always exactly
/// [`INSIGHT_TTL_HOURS`].
pub fn insights_to_signals(insights: &[ParsedInsight], now: DateTime<Utc>) -> Vec<Signal> {
    insights
        .iter()
        .map(|insight| Signal {
            id: new_signal_id(),
            signal_type: SignalType::LearnedSuggestion,
            severity: insight.severity,
            domain: insight.domain,
            source: INSIGHT_SOURCE.to_string(),
            title: insight.title.clone(),
            context: insight.context.clone(),
            suggested_action: insight.suggested_action.clone(),
            auto_actionable: false,
            is_dismissed: false,
            is_acted_on: false,
            related_entity_ids: Vec::new(),
            created_at: iso_millis(now),
            expires_at: Some(iso_millis(now + Duration::hours(INSIGHT_TTL_HOURS))),
        })
        .collect()
}

/// Extract the JSON array from raw model output, tolerating surrounding
/// prose by slicing from the first `[` to the last `]`.
pub fn extract_insight_payload(output: &str) -> Option<Value> {
    let trimmed = output.trim();
    let start = trimmed.find('[')?;
    let end = trimmed.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&trimmed[start..=end]) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("insight payload parse failed: {e}");
            None
        }
    }
}

/// Detector-shaped adapter so the normalizer runs in the engine registry
/// like any other detector. Reads the raw payload out of the context.
pub fn detect(ctx: &AnticipationContext) -> Vec<Signal> {
    let raw = match ctx.mcp_data.get(INSIGHTS_KEY) {
        Some(raw) => raw,
        None => return Vec::new(),
    };
    insights_to_signals(&parse_claude_insights(raw), ctx.now)
}

fn nonempty_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
