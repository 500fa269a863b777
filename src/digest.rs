//! Weekly pattern digest builder.
//!
//! Rolls confidence-scored behavioral patterns into a human-readable weekly
//! summary. Pure and idempotent: same patterns in, same digest out.

use crate::types::ProductivityPattern;

/// Patterns below this confidence are too speculative to report. The cutoff
/// is deliberately a named constant — callers that want a different bar use
/// [`build_digest_with_threshold`].
pub const MIN_DIGEST_CONFIDENCE: f64 = 0.4;

/// Sentinel returned when there is nothing to summarize.
pub const EMPTY_DIGEST: &str = "Not enough data yet to generate a weekly digest.";

/// Build the weekly digest at the default confidence cutoff.
pub fn build_weekly_digest(patterns: &[ProductivityPattern]) -> String {
    build_digest_with_threshold(patterns, MIN_DIGEST_CONFIDENCE)
}

/// Build the digest with an explicit confidence cutoff. Below-threshold
/// patterns are silently omitted; inclusion follows input order. When no
/// pattern clears the bar the sentinel is returned, same as for no input.
pub fn build_digest_with_threshold(patterns: &[ProductivityPattern], min_confidence: f64) -> String {
    if patterns.is_empty() {
        return EMPTY_DIGEST.to_string();
    }

    let lines: Vec<String> = patterns
        .iter()
        .filter(|p| p.confidence >= min_confidence)
        .map(|p| format!("- {}", p.description))
        .collect();

    if lines.is_empty() {
        return EMPTY_DIGEST.to_string();
    }

    format!("Your week in patterns:\n{}", lines.join("\n"))
}
