//! Domain entities consumed by the detectors.
//!
//! Everything here is a read-only snapshot row assembled by the orchestrator
//! from live query results. Detectors never write these back; lifecycle
//! transitions (deal status, task completion, analysis timestamps) happen
//! externally.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Real-estate deal pipeline
// =============================================================================

/// Deal pipeline status. Closed set — `Closed` and `Dead` are terminal and
/// exempt from staleness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Analyzing,
    UnderContract,
    Closed,
    Dead,
}

impl DealStatus {
    /// Terminal deals left the pipeline; no amount of staleness matters.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStatus::Closed | DealStatus::Dead)
    }

    /// Human-readable label for signal context text.
    pub fn label(&self) -> &'static str {
        match self {
            DealStatus::Analyzing => "analyzing",
            DealStatus::UnderContract => "under contract",
            DealStatus::Closed => "closed",
            DealStatus::Dead => "dead",
        }
    }
}

/// A property in the real-estate deal pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub strategy: String,
    pub status: DealStatus,
    /// Bumped externally whenever analysis work occurs. Absent means the
    /// deal has never been analyzed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_email_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_task_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Tasks / projects / categories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub domain: crate::signal::LifeDomain,
}

// =============================================================================
// Email / calendar
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailItem {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub replied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// =============================================================================
// Learned behavioral patterns
// =============================================================================

/// A confidence-scored behavioral pattern produced by the (external)
/// learning process. Consumed read-only by the weekly digest builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityPattern {
    pub id: String,
    pub pattern_type: String,
    pub description: String,
    /// Opaque payload; the digest builder never looks inside.
    #[serde(default)]
    pub data: serde_json::Value,
    /// 0.0–1.0
    pub confidence: f64,
    pub week_start: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(DealStatus::Closed.is_terminal());
        assert!(DealStatus::Dead.is_terminal());
        assert!(!DealStatus::Analyzing.is_terminal());
        assert!(!DealStatus::UnderContract.is_terminal());
    }

    #[test]
    fn test_deal_status_tags() {
        assert_eq!(
            serde_json::to_string(&DealStatus::UnderContract).unwrap(),
            "\"under_contract\""
        );
        let parsed: DealStatus = serde_json::from_str("\"analyzing\"").unwrap();
        assert_eq!(parsed, DealStatus::Analyzing);
    }

    #[test]
    fn test_deal_round_trips_without_analysis_timestamp() {
        let deal = Deal {
            id: "deal-1".to_string(),
            address: "14 Maple St".to_string(),
            city: "Springfield".to_string(),
            state: "OH".to_string(),
            zip: "45501".to_string(),
            strategy: "brrrr".to_string(),
            status: DealStatus::Analyzing,
            last_analysis_at: None,
            linked_email_ids: vec![],
            linked_task_ids: vec![],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&deal).unwrap();
        assert!(json.get("lastAnalysisAt").is_none(), "absent timestamp stays absent");
        let back: Deal = serde_json::from_value(json).unwrap();
        assert!(back.last_analysis_at.is_none());
    }
}
