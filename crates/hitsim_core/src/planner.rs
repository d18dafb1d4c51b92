use crate::interval::{intervals, skip_amount};
use crate::priority::resolve;
use crate::{
    Adjustment, CounterId, HitPlan, Inventory, RunOutcome, SimulationConfig, SimulationError,
    SimulationRequest, StepResult, HIT_COST,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerState {
    /// Next step to execute.
    Running(usize),
    Halted(SimulationError),
    Completed,
}

/// Steps through a hit plan, drawing skip consumption from the adjustment
/// counter and hit consumption from the target counter.
///
/// The adjustment counter is sticky: it is only re-resolved when it can no
/// longer cover the pending skip. The target counter never changes.
#[derive(Debug, Clone)]
pub struct Planner {
    plan: HitPlan,
    intervals: Vec<i64>,
    config: SimulationConfig,
    inventory: Inventory,
    adjustment: CounterId,
    steps: Vec<StepResult>,
    state: PlannerState,
}

impl Planner {
    pub fn new(request: SimulationRequest) -> Self {
        let SimulationRequest {
            inventory,
            plan,
            config,
        } = request;
        let intervals = intervals(&plan.positions());
        let adjustment = resolve(&inventory, config.target);
        let state = if plan.is_empty() {
            PlannerState::Completed
        } else {
            PlannerState::Running(0)
        };
        Self {
            plan,
            intervals,
            config,
            inventory,
            adjustment,
            steps: Vec::new(),
            state,
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Counter that will absorb the next skip, unless it has to be re-resolved.
    pub fn adjustment_counter(&self) -> CounterId {
        self.adjustment
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// Executes one step. A no-op once the planner has halted or completed.
    pub fn step(&mut self) -> &PlannerState {
        let PlannerState::Running(index) = self.state else {
            return &self.state;
        };

        self.state = match self.advance(index) {
            Ok(()) if index + 1 < self.plan.len() => PlannerState::Running(index + 1),
            Ok(()) => PlannerState::Completed,
            Err(err) => {
                tracing::debug!(step = index, error = %err, "planner halted");
                PlannerState::Halted(err)
            }
        };
        &self.state
    }

    /// Runs every remaining step and returns the outcome.
    pub fn run(mut self) -> RunOutcome {
        while matches!(self.step(), PlannerState::Running(_)) {}

        let halt = match self.state {
            PlannerState::Halted(err) => Some(err),
            PlannerState::Completed | PlannerState::Running(_) => None,
        };
        RunOutcome {
            steps: self.steps,
            inventory: self.inventory,
            halt,
        }
    }

    fn advance(&mut self, index: usize) -> Result<(), SimulationError> {
        let event = &self.plan.events()[index];
        let position = event.position;
        let label = event.label.clone();
        let skip = skip_amount(self.intervals[index]);

        let adjustment = if skip > 0 {
            self.draw_skip(position, skip)?
        } else {
            Adjustment::None
        };
        let after_adjustment = self.inventory;

        self.draw_hit(position)?;

        tracing::trace!(
            position,
            ?adjustment,
            attack = self.inventory.attack,
            critical = self.inventory.critical,
            element = self.inventory.element,
            "step applied"
        );
        self.steps.push(StepResult {
            hit_ordinal: position,
            hit_label: label,
            adjustment,
            after_adjustment,
            inventory: self.inventory,
        });
        Ok(())
    }

    fn draw_skip(&mut self, position: i64, skip: i64) -> Result<Adjustment, SimulationError> {
        let floor = self.config.floor();
        let target = self.config.target;

        if self.config.is_floor_aware() {
            if self.inventory[self.adjustment].saturating_sub(skip) < floor {
                self.adjustment = resolve(&self.inventory, target);
                let available = self.inventory[self.adjustment];
                if available.saturating_sub(skip) < floor {
                    return Err(SimulationError::AdjustmentShortfall {
                        counter: self.adjustment,
                        position,
                        required: skip,
                        available,
                        floor,
                    });
                }
            }
            self.inventory.consume(self.adjustment, skip);
        } else {
            if self.inventory[self.adjustment] < skip {
                self.adjustment = resolve(&self.inventory, target);
            }
            let available = self.inventory[self.adjustment];
            // Overdraw first; the negative value stays in the final inventory.
            self.inventory.consume(self.adjustment, skip);
            if self.inventory[self.adjustment] < 0 {
                return Err(SimulationError::AdjustmentShortfall {
                    counter: self.adjustment,
                    position,
                    required: skip,
                    available,
                    floor,
                });
            }
        }

        Ok(Adjustment::Skip {
            counter: self.adjustment,
            amount: skip,
        })
    }

    fn draw_hit(&mut self, position: i64) -> Result<(), SimulationError> {
        let target = self.config.target;
        let floor = self.config.floor();
        let available = self.inventory[target];
        let shortfall = SimulationError::TargetShortfall {
            counter: target,
            position,
            required: HIT_COST,
            available,
            floor,
        };

        if self.config.is_floor_aware() {
            if available.saturating_sub(HIT_COST) < floor {
                return Err(shortfall);
            }
            self.inventory.consume(target, HIT_COST);
        } else {
            self.inventory.consume(target, HIT_COST);
            if self.inventory[target] < 0 {
                return Err(shortfall);
            }
        }
        Ok(())
    }
}

/// Runs a validated request to completion or to its first shortfall.
pub fn simulate(request: SimulationRequest) -> RunOutcome {
    Planner::new(request).run()
}
