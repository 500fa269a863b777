//! Aging-email detector.
//!
//! Inbox threads that are neither archived nor replied to past the aging
//! window get rolled into a single `aging_email` signal. One aggregate per
//! cycle keeps a neglected inbox from flooding the signal list.

use crate::context::AnticipationContext;
use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity, Signal, SignalType};

/// Days before an unhandled email counts as aging.
pub const AGING_EMAIL_DAYS: i64 = 3;
/// When the oldest unhandled email is older than this, the signal escalates.
pub const AGING_EMAIL_URGENT_DAYS: i64 = 7;

/// Provenance string carried on every signal from this detector.
pub const SOURCE: &str = "aging-email-detector";

pub fn detect_aging_emails(ctx: &AnticipationContext) -> Vec<Signal> {
    let mut aging_ids = Vec::new();
    let mut oldest_days = 0i64;
    let mut oldest_subject = String::new();

    for email in &ctx.emails {
        if email.archived || email.replied {
            continue;
        }
        let age_days = (ctx.now - email.received_at).num_days();
        if age_days <= AGING_EMAIL_DAYS {
            continue;
        }
        if age_days > oldest_days {
            oldest_days = age_days;
            oldest_subject = email.subject.clone();
        }
        aging_ids.push(email.id.clone());
    }

    if aging_ids.is_empty() {
        return Vec::new();
    }

    let severity = if oldest_days > AGING_EMAIL_URGENT_DAYS {
        Severity::Urgent
    } else {
        Severity::Attention
    };

    vec![Signal {
        id: new_signal_id(),
        signal_type: SignalType::AgingEmail,
        severity,
        domain: LifeDomain::BusinessRe,
        source: SOURCE.to_string(),
        title: format!("{} emails aging without a reply", aging_ids.len()),
        context: format!(
            "Oldest is \"{}\" at {} days. Unhandled threads go cold fast.",
            oldest_subject, oldest_days
        ),
        suggested_action: Some("Triage the backlog: reply to or archive the oldest threads.".to_string()),
        auto_actionable: false,
        is_dismissed: false,
        is_acted_on: false,
        related_entity_ids: aging_ids,
        created_at: iso_millis(ctx.now),
        expires_at: None,
    }]
}
