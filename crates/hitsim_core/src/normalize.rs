//! Input normalization: raw field strings into a validated `SimulationRequest`.
//!
//! Checks run in a fixed order and the first failure wins:
//! counters, all-zero inventory, hit list, labels, target, reserve floor.

use std::collections::HashSet;

use crate::{
    CounterId, HitEvent, HitPlan, InputField, Inventory, LabelPolicy, RawInput, SimulationConfig,
    SimulationError, SimulationRequest, HIT_COST,
};

pub fn normalize(raw: &RawInput) -> Result<SimulationRequest, SimulationError> {
    let inventory = parse_inventory(raw)?;
    if inventory.is_all_zero() {
        return Err(SimulationError::AllZeroInventory);
    }

    let positions = parse_hits(&raw.hits)?;
    let labels = parse_labels(&raw.labels);
    let events = pair_labels(&positions, labels, raw.label_policy)?;

    let target = raw
        .target
        .parse::<CounterId>()
        .map_err(|_| SimulationError::InvalidTarget {
            value: raw.target.trim().to_string(),
        })?;
    let reserve_floor = parse_reserve_floor(raw.reserve_floor.as_deref())?;

    tracing::debug!(
        hits = events.len(),
        %target,
        ?reserve_floor,
        "input normalized"
    );

    Ok(SimulationRequest {
        inventory,
        plan: HitPlan::from_events(events),
        config: SimulationConfig {
            target,
            reserve_floor,
        },
    })
}

fn parse_inventory(raw: &RawInput) -> Result<Inventory, SimulationError> {
    let mut inventory = Inventory::default();
    for counter in CounterId::ALL {
        let token = raw.counter(counter).trim();
        if token.is_empty() {
            return Err(SimulationError::MissingInventoryField { counter });
        }
        let quantity = token
            .parse::<i64>()
            .map_err(|_| SimulationError::InvalidNumber {
                field: InputField::Counter(counter),
                token: token.to_string(),
            })?;
        if quantity < 0 {
            return Err(SimulationError::NegativeInventory { counter, quantity });
        }
        *inventory.get_mut(counter) = quantity;
    }
    Ok(inventory)
}

/// Parses the comma-separated hit list, in input order.
pub fn parse_hits(field: &str) -> Result<Vec<i64>, SimulationError> {
    if field.trim().is_empty() {
        return Err(SimulationError::EmptyHits);
    }

    let positions = field
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<i64>()
                .map_err(|_| SimulationError::InvalidNumber {
                    field: InputField::Hits,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if positions.contains(&0) {
        return Err(SimulationError::ZeroHit);
    }

    let mut seen = HashSet::with_capacity(positions.len());
    if let Some(&position) = positions.iter().find(|&&p| !seen.insert(p)) {
        return Err(SimulationError::DuplicateHit { position });
    }

    check_skip_range(&positions)?;
    Ok(positions)
}

/// Rejects plans whose gaps or skip amounts do not fit in an `i64`, naming
/// the position that opens the oversized gap.
fn check_skip_range(positions: &[i64]) -> Result<(), SimulationError> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();

    let mut previous = 0_i64;
    for position in sorted {
        let skip = position
            .checked_sub(previous)
            .and_then(|gap| gap.checked_sub(1))
            .and_then(|gap| gap.checked_mul(HIT_COST));
        if skip.is_none() {
            return Err(SimulationError::InvalidNumber {
                field: InputField::Hits,
                token: position.to_string(),
            });
        }
        previous = position;
    }
    Ok(())
}

/// Splits the label list on commas. A blank field means no labels at all;
/// blank entries inside a list keep their slot (the strict policy drops them
/// later, before counting).
pub fn parse_labels(field: &str) -> Vec<String> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    field.split(',').map(|label| label.trim().to_string()).collect()
}

fn pair_labels(
    positions: &[i64],
    labels: Vec<String>,
    policy: LabelPolicy,
) -> Result<Vec<HitEvent>, SimulationError> {
    let labels = match policy {
        // Blank entries carry no label, so they neither count nor pair.
        LabelPolicy::Strict => {
            let labels: Vec<String> = labels.into_iter().filter(|l| !l.is_empty()).collect();
            if labels.len() != positions.len() {
                return Err(SimulationError::CountMismatch {
                    hits: positions.len(),
                    labels: labels.len(),
                });
            }
            labels
        }
        LabelPolicy::Tolerant => labels,
    };
    if labels.len() != positions.len() {
        tracing::debug!(
            hits = positions.len(),
            labels = labels.len(),
            "label count differs from hit count, padding with empty labels"
        );
    }

    let mut labels = labels.into_iter();
    Ok(positions
        .iter()
        .map(|&position| HitEvent {
            position,
            label: labels.next().unwrap_or_default(),
        })
        .collect())
}

fn parse_reserve_floor(field: Option<&str>) -> Result<Option<u32>, SimulationError> {
    let Some(token) = field.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    token
        .parse::<u32>()
        .map(Some)
        .map_err(|_| SimulationError::InvalidNumber {
            field: InputField::ReserveFloor,
            token: token.to_string(),
        })
}
