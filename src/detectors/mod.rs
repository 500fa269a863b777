//! Signal detectors.
//!
//! Each detector is a total, side-effect-free function over the context
//! snapshot returning zero or more signals. Detectors do no AI calls and
//! never read another detector's output; missing or malformed optional
//! context data degrades to "no signal," never to failure.

pub mod deals;
pub mod email;
pub mod portfolio;
pub mod tasks;

use crate::context::AnticipationContext;
use crate::signal::Signal;

/// Function signature for a detector.
pub type DetectorFn = fn(&AnticipationContext) -> Vec<Signal>;
