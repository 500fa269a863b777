//! Signal intelligence engine for the life-and-business dashboard.
//!
//! Scans heterogeneous domain state — tasks, deals, email, financial
//! positions, externally-generated AI insights — and produces a ranked set
//! of short-lived, typed [`Signal`]s. Detectors are pure functions over an
//! immutable [`AnticipationContext`] snapshot; the engine isolates
//! per-detector faults, enforces declared signal repertoires, and dedups
//! against signals still live from previous cycles.
//!
//! The reactive store, dashboard UI, and AI invocation are collaborators on
//! the other side of the [`engine::ContextProvider`] seam; this crate only
//! consumes their query results and JSON output.

pub mod context;
pub mod detectors;
pub mod digest;
pub mod engine;
mod error;
pub mod insights;
pub mod signal;
pub mod types;

pub use context::AnticipationContext;
pub use engine::{default_engine, run_scan, AnticipationEngine, ContextProvider, CycleReport};
pub use error::EngineError;
pub use signal::{LifeDomain, Severity, Signal, SignalType};
