//! Signal data model.
//!
//! A `Signal` is the atomic unit of "something needs attention now": typed,
//! severity-ranked, time-bounded, and immutable once created. Detectors
//! create signals; only the UI layer flips `is_dismissed`/`is_acted_on`
//! afterwards.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Urgency tier. Ordering matters: `Info < Attention < Urgent < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Attention,
    Urgent,
    Critical,
}

impl Severity {
    /// Parse a severity tag. Returns `None` for anything outside the four
    /// known tiers — callers decide the default, never this function.
    pub fn parse(s: &str) -> Option<Severity> {
        match s {
            "info" => Some(Severity::Info),
            "attention" => Some(Severity::Attention),
            "urgent" => Some(Severity::Urgent),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Urgent => "urgent",
            Severity::Critical => "critical",
        }
    }
}

/// Life domain a signal belongs to. Closed set — unrecognized domain strings
/// from external payloads are normalized at the parse boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeDomain {
    Finance,
    BusinessRe,
    BusinessTech,
    PersonalGrowth,
    Health,
}

impl LifeDomain {
    pub fn parse(s: &str) -> Option<LifeDomain> {
        match s {
            "finance" => Some(LifeDomain::Finance),
            "business_re" => Some(LifeDomain::BusinessRe),
            "business_tech" => Some(LifeDomain::BusinessTech),
            "personal_growth" => Some(LifeDomain::PersonalGrowth),
            "health" => Some(LifeDomain::Health),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeDomain::Finance => "finance",
            LifeDomain::BusinessRe => "business_re",
            LifeDomain::BusinessTech => "business_tech",
            LifeDomain::PersonalGrowth => "personal_growth",
            LifeDomain::Health => "health",
        }
    }
}

/// Signal type. Each detector declares the subset it may emit; the engine
/// enforces that declaration at collection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    PortfolioAlert,
    DealUpdate,
    LearnedSuggestion,
    AgingEmail,
    TaskOverdue,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::PortfolioAlert => "portfolio_alert",
            SignalType::DealUpdate => "deal_update",
            SignalType::LearnedSuggestion => "learned_suggestion",
            SignalType::AgingEmail => "aging_email",
            SignalType::TaskOverdue => "task_overdue",
        }
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// A surfaced notice. Timestamps are RFC3339 strings with millisecond
/// precision so the record round-trips unchanged through JSON storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub severity: Severity,
    pub domain: LifeDomain,
    /// Stable identifier of the producing detector (provenance + dedup key).
    pub source: String,
    pub title: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Whether the UI may act without confirmation. Always `false` for
    /// signals produced by this engine; reserved for future automation.
    pub auto_actionable: bool,
    #[serde(default)]
    pub is_dismissed: bool,
    #[serde(default)]
    pub is_acted_on: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entity_ids: Vec<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl Signal {
    /// A signal strictly past its `expires_at` is stale and should not be
    /// surfaced; at the expiry instant itself it is still live. Signals
    /// without an expiry never go stale. Unparseable expiry timestamps are
    /// treated as not expired — the consumer drops the signal at the next
    /// successful cycle anyway.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match &self.expires_at {
            Some(ts) => DateTime::parse_from_rfc3339(ts)
                .map(|t| t.with_timezone(&Utc) < now)
                .unwrap_or(false),
            None => false,
        }
    }

    /// Dedup fingerprint over `(source, type, related entity ids)`. Two
    /// signals about the same entities from the same detector collide, so
    /// a still-live signal suppresses its re-emission on the next cycle.
    ///
    /// Signals not tied to any entity (AI insights, portfolio alerts) are
    /// discriminated by title instead — otherwise every such signal from
    /// one detector would share a single key and collapse to one per cycle.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hasher.update(b"|");
        hasher.update(self.signal_type.as_str().as_bytes());
        hasher.update(b"|");
        if self.related_entity_ids.is_empty() {
            hasher.update(self.title.as_bytes());
            hasher.update(b"|");
        }
        for id in &self.related_entity_ids {
            hasher.update(id.as_bytes());
            hasher.update(b"|");
        }
        hex::encode(hasher.finalize())
    }
}

/// Mint a new signal id.
pub fn new_signal_id() -> String {
    format!("sig-{}", Uuid::new_v4())
}

/// RFC3339 with millisecond precision, UTC ("Z" suffix).
pub fn iso_millis(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
