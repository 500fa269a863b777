//! Demo scanner: seeds a representative context snapshot, runs the default
//! engine, and prints the ranked signals plus the weekly digest as JSON.
//!
//! Useful for eyeballing detector output without the dashboard attached:
//!
//! ```sh
//! RUST_LOG=debug cargo run --bin signal-scan
//! ```

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use anticipation::digest::build_weekly_digest;
use anticipation::types::{Deal, DealStatus, EmailItem, ProductivityPattern, TaskItem};
use anticipation::{default_engine, run_scan, AnticipationContext, ContextProvider, EngineError};

struct SampleProvider;

impl ContextProvider for SampleProvider {
    fn snapshot(&self) -> Result<AnticipationContext, EngineError> {
        let now = Utc::now();
        let mut ctx = AnticipationContext::at(now);

        ctx.mcp_data.insert(
            "alpaca".to_string(),
            json!({
                "equity": 48_210.40,
                "dayPnl": -650.75,
                "positions": [
                    {"symbol": "NVDA", "qty": "12"},
                    {"symbol": "VTI", "qty": "30"},
                ],
            }),
        );

        ctx.mcp_data.insert(
            "claudeInsights".to_string(),
            json!([
                {
                    "title": "Tuesday mornings are your analysis window",
                    "context": "Deal analysis sessions logged on Tuesday mornings run 40% longer than any other slot.",
                    "severity": "info",
                    "domain": "business_re",
                    "suggestedAction": "Block Tuesday 9-11am for pipeline work."
                }
            ]),
        );

        ctx.deals = vec![Deal {
            id: "deal-maple".to_string(),
            address: "14 Maple St".to_string(),
            city: "Springfield".to_string(),
            state: "OH".to_string(),
            zip: "45501".to_string(),
            strategy: "brrrr".to_string(),
            status: DealStatus::Analyzing,
            last_analysis_at: Some(now - Duration::days(9)),
            linked_email_ids: vec!["email-lender".to_string()],
            linked_task_ids: vec![],
            created_at: now - Duration::days(21),
        }];

        ctx.emails = vec![EmailItem {
            id: "email-lender".to_string(),
            subject: "Updated rate sheet for Maple St".to_string(),
            sender: "lender@example.com".to_string(),
            received_at: now - Duration::days(5),
            archived: false,
            replied: false,
        }];

        ctx.tasks = vec![TaskItem {
            id: "task-insurance".to_string(),
            title: "Get insurance quote for Maple St".to_string(),
            completed: false,
            due_date: Some(now - Duration::days(2)),
            project_id: None,
        }];

        ctx.patterns = vec![ProductivityPattern {
            id: "pat-1".to_string(),
            pattern_type: "focus_window".to_string(),
            description: "Deep work lands before 10am".to_string(),
            data: serde_json::Value::Null,
            confidence: 0.82,
            week_start: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            created_at: now,
        }];

        Ok(ctx)
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();

    let provider = SampleProvider;
    let engine = default_engine();

    let snapshot_patterns = provider.snapshot()?.patterns;
    let report = run_scan(&provider, &engine)?;

    log::info!(
        "scan complete: {} signal(s), {} detector failure(s)",
        report.signals.len(),
        report.detector_failures.len()
    );

    println!("{}", serde_json::to_string_pretty(&report.signals)?);
    println!("\n{}", build_weekly_digest(&snapshot_patterns));

    Ok(())
}
