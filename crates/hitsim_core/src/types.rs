//! Type definitions for `hitsim_core`.
//!
//! Counters, inventory, hit plans, per-step results and the error taxonomy
//! shared by the normalizer and the planner.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units every hit draws from the target counter, and per skipped position
/// from the adjustment counter.
pub const HIT_COST: i64 = 3;

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterId {
    Attack,
    Critical,
    Element,
}

impl CounterId {
    /// Canonical ordering. Also the tie-break precedence of the priority resolver.
    pub const ALL: [CounterId; 3] = [CounterId::Attack, CounterId::Critical, CounterId::Element];

    pub fn as_str(self) -> &'static str {
        match self {
            CounterId::Attack => "attack",
            CounterId::Critical => "critical",
            CounterId::Element => "element",
        }
    }

    /// Human-facing name used by reporters.
    pub fn display_name(self) -> &'static str {
        match self {
            CounterId::Attack => "Attack",
            CounterId::Critical => "Critical",
            CounterId::Element => "Element",
        }
    }

    /// The two counters other than `self`, in canonical order.
    pub fn others(self) -> [CounterId; 2] {
        match self {
            CounterId::Attack => [CounterId::Critical, CounterId::Element],
            CounterId::Critical => [CounterId::Attack, CounterId::Element],
            CounterId::Element => [CounterId::Attack, CounterId::Critical],
        }
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown counter '{0}' (expected attack, critical or element)")]
pub struct UnknownCounter(pub String);

impl FromStr for CounterId {
    type Err = UnknownCounter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" | "atk" => Ok(CounterId::Attack),
            "critical" | "crt" => Ok(CounterId::Critical),
            "element" | "elm" => Ok(CounterId::Element),
            _ => Err(UnknownCounter(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Quantities held by the three counters. Values may go negative once a
/// floor-agnostic run overdraws a counter; the run halts right after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub attack: i64,
    pub critical: i64,
    pub element: i64,
}

impl Inventory {
    pub fn new(attack: i64, critical: i64, element: i64) -> Self {
        Self {
            attack,
            critical,
            element,
        }
    }

    pub fn get(&self, counter: CounterId) -> i64 {
        self[counter]
    }

    pub fn get_mut(&mut self, counter: CounterId) -> &mut i64 {
        match counter {
            CounterId::Attack => &mut self.attack,
            CounterId::Critical => &mut self.critical,
            CounterId::Element => &mut self.element,
        }
    }

    pub(crate) fn consume(&mut self, counter: CounterId, amount: i64) {
        let quantity = self.get_mut(counter);
        *quantity = quantity.saturating_sub(amount);
    }

    pub fn is_all_zero(&self) -> bool {
        CounterId::ALL.iter().all(|&c| self.get(c) == 0)
    }
}

impl Index<CounterId> for Inventory {
    type Output = i64;

    fn index(&self, counter: CounterId) -> &i64 {
        match counter {
            CounterId::Attack => &self.attack,
            CounterId::Critical => &self.critical,
            CounterId::Element => &self.element,
        }
    }
}

// ---------------------------------------------------------------------------
// Hit plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Nonzero hit index, unique within a plan.
    pub position: i64,
    /// Weapon/source name paired by input order.
    pub label: String,
}

/// Hit events sorted ascending by position. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitPlan(Vec<HitEvent>);

impl HitPlan {
    /// Sorts `events` by position. The sort is stable, so each label stays
    /// with the position it was paired with.
    pub fn from_events(mut events: Vec<HitEvent>) -> Self {
        events.sort_by_key(|event| event.position);
        Self(events)
    }

    pub fn events(&self) -> &[HitEvent] {
        &self.0
    }

    pub fn positions(&self) -> Vec<i64> {
        self.0.iter().map(|event| event.position).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How a label list whose length differs from the hit list is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Missing labels become empty strings; surplus labels are ignored.
    #[default]
    Tolerant,
    /// Blank labels are dropped, then any count difference is a
    /// `CountMismatch` error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub target: CounterId,
    /// `Some` switches the planner to floor-aware mode. `None` runs
    /// floor-agnostic with an effective floor of 0.
    pub reserve_floor: Option<u32>,
}

impl SimulationConfig {
    pub fn new(target: CounterId) -> Self {
        Self {
            target,
            reserve_floor: None,
        }
    }

    #[must_use]
    pub fn with_reserve_floor(mut self, floor: u32) -> Self {
        self.reserve_floor = Some(floor);
        self
    }

    pub fn floor(&self) -> i64 {
        self.reserve_floor.map_or(0, i64::from)
    }

    pub fn is_floor_aware(&self) -> bool {
        self.reserve_floor.is_some()
    }
}

/// Raw field values as a host collects them, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub attack: String,
    pub critical: String,
    pub element: String,
    pub hits: String,
    pub labels: String,
    pub target: String,
    #[serde(default)]
    pub reserve_floor: Option<String>,
    #[serde(default)]
    pub label_policy: LabelPolicy,
}

impl RawInput {
    pub fn counter(&self, counter: CounterId) -> &str {
        match counter {
            CounterId::Attack => &self.attack,
            CounterId::Critical => &self.critical,
            CounterId::Element => &self.element,
        }
    }
}

/// Validated input ready for the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub inventory: Inventory,
    pub plan: HitPlan,
    pub config: SimulationConfig,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Interval of 1 (or less): nothing drawn before the hit.
    None,
    /// Skip consumption drawn from a non-target counter.
    Skip { counter: CounterId, amount: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// The hit position this step resolved.
    pub hit_ordinal: i64,
    pub hit_label: String,
    pub adjustment: Adjustment,
    /// Inventory after skip consumption, before the hit.
    pub after_adjustment: Inventory,
    /// Inventory after the hit.
    pub inventory: Inventory,
}

impl StepResult {
    pub fn adjustment_counter(&self) -> Option<CounterId> {
        match self.adjustment {
            Adjustment::Skip { counter, .. } => Some(counter),
            Adjustment::None => None,
        }
    }

    pub fn adjustment_amount(&self) -> i64 {
        match self.adjustment {
            Adjustment::Skip { amount, .. } => amount,
            Adjustment::None => 0,
        }
    }
}

/// Output of a planner run that got past normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Steps completed before any halt.
    pub steps: Vec<StepResult>,
    /// Inventory at the end of the run, or at the point of halting.
    pub inventory: Inventory,
    pub halt: Option<SimulationError>,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        self.halt.is_none()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Counter(CounterId),
    Hits,
    ReserveFloor,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::Counter(counter) => write!(f, "{counter}"),
            InputField::Hits => f.write_str("hits"),
            InputField::ReserveFloor => f.write_str("reserve floor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingInventoryField,
    InvalidNumber,
    NegativeInventory,
    AllZeroInventory,
    EmptyHits,
    ZeroHit,
    DuplicateHit,
    CountMismatch,
    InvalidTarget,
    AdjustmentShortfall,
    TargetShortfall,
}

/// Terminal condition of a run. Input variants are raised before any step
/// executes; the two shortfall variants halt a run part-way.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("{counter} quantity is missing")]
    MissingInventoryField { counter: CounterId },

    #[error("{field}: '{token}' is not a valid number")]
    InvalidNumber { field: InputField, token: String },

    #[error("{counter} quantity {quantity} is negative")]
    NegativeInventory { counter: CounterId, quantity: i64 },

    #[error("all counters are zero")]
    AllZeroInventory,

    #[error("no hit positions given")]
    EmptyHits,

    #[error("hit positions cannot contain 0")]
    ZeroHit,

    #[error("hit position {position} is duplicated")]
    DuplicateHit { position: i64 },

    #[error("hit count ({hits}) and label count ({labels}) differ")]
    CountMismatch { hits: usize, labels: usize },

    #[error("unknown target counter '{value}'")]
    InvalidTarget { value: String },

    #[error(
        "{counter} ran short while adjusting before hit {position}: \
         needed {required}, had {available}, floor {floor}"
    )]
    AdjustmentShortfall {
        counter: CounterId,
        position: i64,
        required: i64,
        available: i64,
        floor: i64,
    },

    #[error(
        "{counter} ran short on hit {position}: \
         needed {required}, had {available}, floor {floor}"
    )]
    TargetShortfall {
        counter: CounterId,
        position: i64,
        required: i64,
        available: i64,
        floor: i64,
    },
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::MissingInventoryField { .. } => ErrorKind::MissingInventoryField,
            SimulationError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            SimulationError::NegativeInventory { .. } => ErrorKind::NegativeInventory,
            SimulationError::AllZeroInventory => ErrorKind::AllZeroInventory,
            SimulationError::EmptyHits => ErrorKind::EmptyHits,
            SimulationError::ZeroHit => ErrorKind::ZeroHit,
            SimulationError::DuplicateHit { .. } => ErrorKind::DuplicateHit,
            SimulationError::CountMismatch { .. } => ErrorKind::CountMismatch,
            SimulationError::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            SimulationError::AdjustmentShortfall { .. } => ErrorKind::AdjustmentShortfall,
            SimulationError::TargetShortfall { .. } => ErrorKind::TargetShortfall,
        }
    }

    /// True for the mid-run shortfall variants.
    pub fn is_shortfall(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AdjustmentShortfall | ErrorKind::TargetShortfall
        )
    }
}
