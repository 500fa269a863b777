//! The read-only context snapshot detectors run against.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::signal::Signal;
use crate::types::{CalendarEvent, Category, Deal, EmailItem, ProductivityPattern, ProjectItem, TaskItem};

/// Aggregated snapshot of all domain state, built once per detection cycle.
///
/// Detectors take `&AnticipationContext` and never mutate it; a new cycle
/// gets a fresh snapshot. `now` is captured at snapshot time so every
/// detector in the cycle agrees on the clock.
#[derive(Debug, Clone)]
pub struct AnticipationContext {
    pub tasks: Vec<TaskItem>,
    pub projects: Vec<ProjectItem>,
    pub categories: Vec<Category>,
    pub emails: Vec<EmailItem>,
    pub events: Vec<CalendarEvent>,
    pub deals: Vec<Deal>,
    /// Signals surfaced by previous cycles that are still live. Used by the
    /// engine for cross-cycle dedup; detectors themselves never read it.
    pub existing_signals: Vec<Signal>,
    pub patterns: Vec<ProductivityPattern>,
    /// Free-form external market/integration data keyed by integration name
    /// (e.g. `"alpaca"` portfolio snapshot, `"claudeInsights"` AI output).
    /// Values are structurally unverified — consumers parse defensively.
    pub mcp_data: HashMap<String, Value>,
    pub now: DateTime<Utc>,
}

impl AnticipationContext {
    /// Empty snapshot pinned to `now`. Orchestrators fill the collections;
    /// tests compose fixtures from this.
    pub fn at(now: DateTime<Utc>) -> Self {
        AnticipationContext {
            tasks: Vec::new(),
            projects: Vec::new(),
            categories: Vec::new(),
            emails: Vec::new(),
            events: Vec::new(),
            deals: Vec::new(),
            existing_signals: Vec::new(),
            patterns: Vec::new(),
            mcp_data: HashMap::new(),
            now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
