//! Overdue-task detector.
//!
//! Incomplete tasks past their due date roll into a single `task_overdue`
//! aggregate, escalating once the pile gets deep enough to need a triage
//! pass rather than a quick catch-up.

use crate::context::AnticipationContext;
use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity, Signal, SignalType};

/// At this many overdue tasks the aggregate escalates to urgent.
pub const OVERDUE_URGENT_COUNT: usize = 5;

/// Provenance string carried on every signal from this detector.
pub const SOURCE: &str = "task-deadline-detector";

pub fn detect_overdue_tasks(ctx: &AnticipationContext) -> Vec<Signal> {
    let mut overdue_ids = Vec::new();
    let mut oldest_days = 0i64;
    let mut oldest_title = String::new();

    for task in &ctx.tasks {
        if task.completed {
            continue;
        }
        let due = match task.due_date {
            Some(due) => due,
            None => continue,
        };
        if due >= ctx.now {
            continue;
        }
        let days_over = (ctx.now - due).num_days();
        if days_over > oldest_days || oldest_title.is_empty() {
            oldest_days = days_over;
            oldest_title = task.title.clone();
        }
        overdue_ids.push(task.id.clone());
    }

    if overdue_ids.is_empty() {
        return Vec::new();
    }

    let severity = if overdue_ids.len() >= OVERDUE_URGENT_COUNT {
        Severity::Urgent
    } else {
        Severity::Attention
    };

    vec![Signal {
        id: new_signal_id(),
        signal_type: SignalType::TaskOverdue,
        severity,
        domain: LifeDomain::PersonalGrowth,
        source: SOURCE.to_string(),
        title: format!("{} overdue task(s) need attention", overdue_ids.len()),
        context: format!(
            "Oldest is \"{}\", {} day(s) past due.",
            oldest_title, oldest_days
        ),
        suggested_action: Some("Reschedule or complete the overdue tasks; stale due dates hide real priorities.".to_string()),
        auto_actionable: false,
        is_dismissed: false,
        is_acted_on: false,
        related_entity_ids: overdue_ids,
        created_at: iso_millis(ctx.now),
        expires_at: None,
    }]
}
