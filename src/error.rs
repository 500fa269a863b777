//! Engine error types.
//!
//! Only systemic faults are errors here. Detector-level failures are
//! isolated by the engine (zero signals for that detector this cycle), and
//! untrusted-payload problems are handled by dropping/defaulting at the
//! parse boundary — neither ever surfaces as an `EngineError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The context snapshot could not be constructed (e.g. the query layer
    /// is unavailable). Non-fatal: prior signals remain valid until the
    /// next successful cycle.
    #[error("unable to refresh signals: {0}")]
    ContextUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
