//! Anticipation engine.
//!
//! Holds the detector registry and runs one detection cycle: every detector
//! against the same immutable snapshot, per-detector fault isolation,
//! repertoire enforcement, fingerprint dedup against still-live signals,
//! and a severity-ranked, capped result.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::context::AnticipationContext;
use crate::detectors::{self, DetectorFn};
use crate::error::EngineError;
use crate::insights;
use crate::signal::{Signal, SignalType};

/// Upper bound on signals surfaced per cycle.
pub const MAX_SIGNALS_PER_CYCLE: usize = 20;

/// A registered detector with its declared signal-type repertoire.
pub struct DetectorEntry {
    pub name: &'static str,
    pub emits: &'static [SignalType],
    pub detector: DetectorFn,
}

/// Outcome of one detection cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Severity-ranked (critical first), deduplicated, capped.
    pub signals: Vec<Signal>,
    /// Names of detectors that panicked this cycle. Informational — their
    /// absence never blocks sibling detectors.
    pub detector_failures: Vec<String>,
}

#[derive(Default)]
pub struct AnticipationEngine {
    detectors: Vec<DetectorEntry>,
}

impl AnticipationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector with the signal types it is allowed to emit.
    pub fn register(&mut self, name: &'static str, emits: &'static [SignalType], detector: DetectorFn) {
        self.detectors.push(DetectorEntry { name, emits, detector });
    }

    /// Run every registered detector against the snapshot.
    ///
    /// Detectors are pure over an immutable context, so they run in
    /// registration order with no shared state; a panicking detector is
    /// caught, logged, and contributes zero signals without disturbing its
    /// siblings.
    pub fn run_cycle(&self, ctx: &AnticipationContext) -> CycleReport {
        let mut report = CycleReport::default();

        // Fingerprints of signals still live from previous cycles: an
        // undismissed, unexpired signal suppresses its own re-emission.
        let mut seen: HashSet<String> = ctx
            .existing_signals
            .iter()
            .filter(|s| !s.is_dismissed && !s.is_expired(ctx.now))
            .map(Signal::fingerprint)
            .collect();

        for entry in &self.detectors {
            let produced = match catch_unwind(AssertUnwindSafe(|| (entry.detector)(ctx))) {
                Ok(signals) => signals,
                Err(_) => {
                    log::warn!("detector {} panicked; skipping it this cycle", entry.name);
                    report.detector_failures.push(entry.name.to_string());
                    continue;
                }
            };

            for signal in produced {
                if !entry.emits.contains(&signal.signal_type) {
                    log::warn!(
                        "detector {} emitted undeclared type {}; dropped",
                        entry.name,
                        signal.signal_type.as_str()
                    );
                    continue;
                }
                let fingerprint = signal.fingerprint();
                if seen.contains(&fingerprint) {
                    continue;
                }
                seen.insert(fingerprint);
                report.signals.push(signal);
            }
        }

        // Stable sort: critical first, detector order preserved within a tier.
        report.signals.sort_by(|a, b| b.severity.cmp(&a.severity));
        report.signals.truncate(MAX_SIGNALS_PER_CYCLE);
        report
    }
}

/// Build the engine with the standard detector set, the insight normalizer
/// included as an ordinary registry entry.
pub fn default_engine() -> AnticipationEngine {
    let mut engine = AnticipationEngine::new();

    engine.register(
        detectors::portfolio::SOURCE,
        &[SignalType::PortfolioAlert],
        detectors::portfolio::detect_portfolio_risk,
    );
    engine.register(
        detectors::deals::SOURCE,
        &[SignalType::DealUpdate],
        detectors::deals::detect_stale_deals,
    );
    engine.register(
        detectors::email::SOURCE,
        &[SignalType::AgingEmail],
        detectors::email::detect_aging_emails,
    );
    engine.register(
        detectors::tasks::SOURCE,
        &[SignalType::TaskOverdue],
        detectors::tasks::detect_overdue_tasks,
    );
    engine.register(
        insights::INSIGHT_SOURCE,
        &[SignalType::LearnedSuggestion],
        insights::detect,
    );

    engine
}

/// Source of context snapshots — the seam between the engine and whatever
/// query layer assembles live domain state.
pub trait ContextProvider {
    fn snapshot(&self) -> Result<AnticipationContext, EngineError>;
}

/// One full scan: snapshot, then cycle. A failed snapshot is the one
/// systemic fault — it surfaces to the caller as a visible, non-fatal
/// error; previously surfaced signals stay valid until the next cycle.
pub fn run_scan(
    provider: &dyn ContextProvider,
    engine: &AnticipationEngine,
) -> Result<CycleReport, EngineError> {
    let ctx = provider.snapshot()?;
    Ok(engine.run_cycle(&ctx))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{iso_millis, new_signal_id, LifeDomain, Severity};
    use crate::types::{Deal, DealStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 9, 0, 0).unwrap()
    }

    fn mock_signal(ctx: &AnticipationContext) -> Signal {
        Signal {
            id: new_signal_id(),
            signal_type: SignalType::TaskOverdue,
            severity: Severity::Attention,
            domain: LifeDomain::PersonalGrowth,
            source: "mock-detector".to_string(),
            title: "Mock".to_string(),
            context: "Mock context".to_string(),
            suggested_action: None,
            auto_actionable: false,
            is_dismissed: false,
            is_acted_on: false,
            related_entity_ids: vec!["t1".to_string()],
            created_at: iso_millis(ctx.now),
            expires_at: None,
        }
    }

    fn mock_detector(ctx: &AnticipationContext) -> Vec<Signal> {
        vec![mock_signal(ctx)]
    }

    fn panicking_detector(_ctx: &AnticipationContext) -> Vec<Signal> {
        panic!("unexpected data shape");
    }

    fn off_repertoire_detector(ctx: &AnticipationContext) -> Vec<Signal> {
        let mut signal = mock_signal(ctx);
        signal.signal_type = SignalType::PortfolioAlert;
        vec![signal]
    }

    #[test]
    fn test_empty_engine_runs_clean() {
        let engine = AnticipationEngine::new();
        let report = engine.run_cycle(&AnticipationContext::at(fixed_now()));
        assert!(report.signals.is_empty());
        assert!(report.detector_failures.is_empty());
    }

    #[test]
    fn test_panicking_detector_does_not_block_siblings() {
        let mut engine = AnticipationEngine::new();
        engine.register("boom", &[SignalType::TaskOverdue], panicking_detector);
        engine.register("mock", &[SignalType::TaskOverdue], mock_detector);

        let report = engine.run_cycle(&AnticipationContext::at(fixed_now()));
        assert_eq!(report.detector_failures, vec!["boom".to_string()]);
        assert_eq!(report.signals.len(), 1, "sibling detector output survives");
    }

    #[test]
    fn test_undeclared_type_is_dropped() {
        let mut engine = AnticipationEngine::new();
        engine.register("rogue", &[SignalType::TaskOverdue], off_repertoire_detector);

        let report = engine.run_cycle(&AnticipationContext::at(fixed_now()));
        assert!(report.signals.is_empty(), "off-repertoire signal must not surface");
        assert!(report.detector_failures.is_empty(), "not a fault, just dropped");
    }

    #[test]
    fn test_live_signal_suppresses_re_emission() {
        let mut engine = AnticipationEngine::new();
        engine.register("mock", &[SignalType::TaskOverdue], mock_detector);

        let mut ctx = AnticipationContext::at(fixed_now());
        let first = engine.run_cycle(&ctx);
        assert_eq!(first.signals.len(), 1);

        // Same signal still live from the previous cycle.
        ctx.existing_signals = first.signals.clone();
        let second = engine.run_cycle(&ctx);
        assert!(second.signals.is_empty(), "live signal deduplicates re-emission");

        // Dismissed signals stop suppressing.
        ctx.existing_signals[0].is_dismissed = true;
        let third = engine.run_cycle(&ctx);
        assert_eq!(third.signals.len(), 1);
    }

    #[test]
    fn test_expired_signal_stops_suppressing() {
        let mut engine = AnticipationEngine::new();
        engine.register("mock", &[SignalType::TaskOverdue], mock_detector);

        let mut ctx = AnticipationContext::at(fixed_now());
        let mut prior = mock_signal(&ctx);
        prior.expires_at = Some(iso_millis(fixed_now() - Duration::hours(1)));
        ctx.existing_signals = vec![prior];

        let report = engine.run_cycle(&ctx);
        assert_eq!(report.signals.len(), 1, "expired prior signal no longer dedups");
    }

    #[test]
    fn test_severity_ranked_output() {
        let ctx = {
            let mut ctx = AnticipationContext::at(fixed_now());
            // Attention-tier deal signal would come first in detector order...
            ctx.deals = vec![Deal {
                id: "d1".to_string(),
                address: "14 Maple St".to_string(),
                city: "Springfield".to_string(),
                state: "OH".to_string(),
                zip: "45501".to_string(),
                strategy: "flip".to_string(),
                status: DealStatus::Analyzing,
                last_analysis_at: Some(fixed_now() - Duration::days(8)),
                linked_email_ids: vec![],
                linked_task_ids: vec![],
                created_at: fixed_now() - Duration::days(30),
            }];
            // ...but the critical portfolio alert must outrank it.
            ctx.mcp_data.insert(
                "alpaca".to_string(),
                json!({"dayPnl": -650.75, "positions": [{"symbol": "NVDA", "qty": "12"}]}),
            );
            ctx
        };

        let mut engine = AnticipationEngine::new();
        engine.register(
            crate::detectors::deals::SOURCE,
            &[SignalType::DealUpdate],
            crate::detectors::deals::detect_stale_deals,
        );
        engine.register(
            crate::detectors::portfolio::SOURCE,
            &[SignalType::PortfolioAlert],
            crate::detectors::portfolio::detect_portfolio_risk,
        );

        let report = engine.run_cycle(&ctx);
        assert_eq!(report.signals.len(), 2);
        assert_eq!(report.signals[0].severity, Severity::Critical);
        assert_eq!(report.signals[1].severity, Severity::Attention);
    }

    #[test]
    fn test_end_to_end_scenario() {
        // A bad trading day plus an 8-day-stale analyzing deal.
        let mut ctx = AnticipationContext::at(fixed_now());
        ctx.mcp_data.insert(
            "alpaca".to_string(),
            json!({"dayPnl": -650.75, "positions": [{"symbol": "NVDA", "qty": "12"}]}),
        );
        ctx.deals = vec![Deal {
            id: "d1".to_string(),
            address: "14 Maple St".to_string(),
            city: "Springfield".to_string(),
            state: "OH".to_string(),
            zip: "45501".to_string(),
            strategy: "brrrr".to_string(),
            status: DealStatus::Analyzing,
            last_analysis_at: Some(fixed_now() - Duration::days(8)),
            linked_email_ids: vec![],
            linked_task_ids: vec![],
            created_at: fixed_now() - Duration::days(30),
        }];

        let report = default_engine().run_cycle(&ctx);
        assert_eq!(report.signals.len(), 2, "exactly two signals for this scenario");

        let portfolio = &report.signals[0];
        assert_eq!(portfolio.signal_type, SignalType::PortfolioAlert);
        assert_eq!(portfolio.severity, Severity::Critical);
        assert_eq!(portfolio.title, "Critical Portfolio Loss: $650.75");

        let deal = &report.signals[1];
        assert_eq!(deal.signal_type, SignalType::DealUpdate);
        assert_eq!(deal.severity, Severity::Attention);
        assert_eq!(deal.title, "Stale Deal: 14 Maple St");
    }

    #[test]
    fn test_distinct_insights_all_surface() {
        let mut ctx = AnticipationContext::at(fixed_now());
        ctx.mcp_data.insert(
            "claudeInsights".to_string(),
            json!([
                {"title": "one", "context": "c1"},
                {"title": "two", "context": "c2"},
                {"title": "three", "context": "c3"},
            ]),
        );

        let report = default_engine().run_cycle(&ctx);
        let titles: Vec<&str> = report
            .signals
            .iter()
            .filter(|s| s.signal_type == SignalType::LearnedSuggestion)
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["one", "two", "three"],
            "distinct insights must not collapse under dedup"
        );

        // Cross-cycle: a live insight suppresses only itself, not new ones.
        ctx.existing_signals = report.signals.clone();
        ctx.mcp_data.insert(
            "claudeInsights".to_string(),
            json!([
                {"title": "one", "context": "c1"},
                {"title": "fresh", "context": "c4"},
            ]),
        );
        let second = default_engine().run_cycle(&ctx);
        let titles: Vec<&str> = second.signals.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["fresh"], "only the still-live insight is suppressed");
    }

    #[test]
    fn test_run_scan_surfaces_systemic_fault() {
        struct BrokenProvider;
        impl ContextProvider for BrokenProvider {
            fn snapshot(&self) -> Result<AnticipationContext, EngineError> {
                Err(EngineError::ContextUnavailable("query layer offline".to_string()))
            }
        }

        let engine = default_engine();
        let err = run_scan(&BrokenProvider, &engine).unwrap_err();
        assert!(
            err.to_string().contains("unable to refresh signals"),
            "visible, non-fatal failure message: {}",
            err
        );
    }

    #[test]
    fn test_run_scan_happy_path() {
        struct EmptyProvider;
        impl ContextProvider for EmptyProvider {
            fn snapshot(&self) -> Result<AnticipationContext, EngineError> {
                Ok(AnticipationContext::at(fixed_now()))
            }
        }

        let report = run_scan(&EmptyProvider, &default_engine()).expect("scan");
        assert!(report.signals.is_empty());
        assert!(report.detector_failures.is_empty());
    }
}
