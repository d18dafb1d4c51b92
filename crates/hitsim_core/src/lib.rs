//! `hitsim_core` — deterministic hit-consumption planning.
//!
//! No IO. Hosts hand in raw field values, get back step results or a typed error.

mod interval;
mod normalize;
mod planner;
mod priority;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use interval::{intervals, skip_amount};
pub use normalize::{normalize, parse_hits, parse_labels};
pub use planner::{simulate, Planner, PlannerState};
pub use priority::resolve;
pub use types::*;

/// Normalizes `raw` and runs it.
///
/// `Err` means the input was rejected before any step ran. Shortfalls are
/// reported through [`RunOutcome::halt`] alongside the steps that completed.
pub fn simulate_raw(raw: &RawInput) -> Result<RunOutcome, SimulationError> {
    normalize(raw).map(simulate)
}

#[cfg(test)]
mod tests;
