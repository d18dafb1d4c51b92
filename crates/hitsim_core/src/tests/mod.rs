use super::*;
use crate::test_fixtures::{base_raw, raw, request};

mod agnostic;
mod properties;

// --- Shared test helpers ------------------------------------------------

fn agnostic(target: CounterId) -> SimulationConfig {
    SimulationConfig::new(target)
}

fn floored(target: CounterId, floor: u32) -> SimulationConfig {
    SimulationConfig::new(target).with_reserve_floor(floor)
}

fn run(inventory: Inventory, positions: &[i64], config: SimulationConfig) -> RunOutcome {
    simulate(request(inventory, positions, config))
}

fn adjustment_counters(outcome: &RunOutcome) -> Vec<Option<CounterId>> {
    outcome
        .steps
        .iter()
        .map(StepResult::adjustment_counter)
        .collect()
}
