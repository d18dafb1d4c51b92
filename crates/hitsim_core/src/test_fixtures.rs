//! Shared test fixtures for hitsim_core and downstream crates.
//!
//! `base_raw()` is a well-formed raw input that completes without a halt.
//! `request()` builds a validated request directly, skipping normalization.

use crate::{
    CounterId, HitEvent, HitPlan, Inventory, LabelPolicy, RawInput, SimulationConfig,
    SimulationRequest,
};

/// 30/12/9 inventory, three hits on `attack`, labels in input order.
pub fn base_raw() -> RawInput {
    RawInput {
        attack: "30".to_string(),
        critical: "12".to_string(),
        element: "9".to_string(),
        hits: "1,4,6".to_string(),
        labels: "sword,bow,axe".to_string(),
        target: "attack".to_string(),
        reserve_floor: None,
        label_policy: LabelPolicy::Tolerant,
    }
}

pub fn raw(inventory: Inventory, hits: &str, target: CounterId) -> RawInput {
    RawInput {
        attack: inventory.attack.to_string(),
        critical: inventory.critical.to_string(),
        element: inventory.element.to_string(),
        hits: hits.to_string(),
        target: target.as_str().to_string(),
        ..RawInput::default()
    }
}

/// Request with unlabeled hits. Positions are sorted as the normalizer would.
pub fn request(
    inventory: Inventory,
    positions: &[i64],
    config: SimulationConfig,
) -> SimulationRequest {
    let events = positions
        .iter()
        .map(|&position| HitEvent {
            position,
            label: format!("hit{position}"),
        })
        .collect();
    SimulationRequest {
        inventory,
        plan: HitPlan::from_events(events),
        config,
    }
}
