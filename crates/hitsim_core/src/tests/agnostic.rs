use super::*;

#[test]
fn test_base_plan_completes_with_sticky_adjustment() {
    let outcome = simulate_raw(&base_raw()).unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.steps.len(), 3);
    assert_eq!(outcome.inventory, Inventory::new(21, 3, 9));
    assert_eq!(
        adjustment_counters(&outcome),
        vec![None, Some(CounterId::Critical), Some(CounterId::Critical)]
    );

    let second = &outcome.steps[1];
    assert_eq!(second.hit_ordinal, 4);
    assert_eq!(second.hit_label, "bow");
    assert_eq!(second.adjustment_amount(), 6);
    assert_eq!(second.after_adjustment, Inventory::new(27, 6, 9));
    assert_eq!(second.inventory, Inventory::new(24, 6, 9));
}

#[test]
fn test_single_hit_at_one_has_no_adjustment() {
    let outcome = run(
        Inventory::new(10, 0, 0),
        &[1],
        agnostic(CounterId::Attack),
    );

    assert!(outcome.is_completed());
    assert_eq!(outcome.steps.len(), 1);
    assert_eq!(outcome.steps[0].adjustment, Adjustment::None);
    assert_eq!(outcome.steps[0].adjustment_amount(), 0);
    assert_eq!(outcome.steps[0].after_adjustment, Inventory::new(10, 0, 0));
    assert_eq!(outcome.inventory, Inventory::new(7, 0, 0));
}

#[test]
fn test_adjustment_switches_only_when_current_cannot_cover() {
    let outcome = run(
        Inventory::new(20, 5, 8),
        &[3, 5],
        agnostic(CounterId::Attack),
    );

    assert!(outcome.is_completed());
    assert_eq!(
        adjustment_counters(&outcome),
        vec![Some(CounterId::Element), Some(CounterId::Critical)]
    );
    assert_eq!(outcome.inventory, Inventory::new(14, 2, 2));
}

#[test]
fn test_target_shortfall_leaves_negative_quantity() {
    let outcome = run(
        Inventory::new(2, 0, 0),
        &[1],
        agnostic(CounterId::Attack),
    );

    assert!(outcome.steps.is_empty());
    assert_eq!(outcome.inventory.attack, -1);
    assert_eq!(
        outcome.halt,
        Some(SimulationError::TargetShortfall {
            counter: CounterId::Attack,
            position: 1,
            required: 3,
            available: 2,
            floor: 0,
        })
    );
}

#[test]
fn test_adjustment_shortfall_overdraws_then_halts() {
    let outcome = run(
        Inventory::new(20, 2, 1),
        &[4],
        agnostic(CounterId::Attack),
    );

    assert!(outcome.steps.is_empty());
    assert_eq!(outcome.inventory, Inventory::new(20, -7, 1));
    assert_eq!(
        outcome.halt,
        Some(SimulationError::AdjustmentShortfall {
            counter: CounterId::Critical,
            position: 4,
            required: 9,
            available: 2,
            floor: 0,
        })
    );
}

#[test]
fn test_completed_steps_survive_a_later_halt() {
    // Third hit needs 3 from attack, which only has 6 at the start.
    let outcome = run(
        Inventory::new(6, 10, 10),
        &[1, 2, 3],
        agnostic(CounterId::Attack),
    );

    assert_eq!(outcome.steps.len(), 2);
    assert_eq!(outcome.steps[1].inventory.attack, 0);
    assert_eq!(
        outcome.halt.as_ref().map(SimulationError::kind),
        Some(ErrorKind::TargetShortfall)
    );
    assert_eq!(outcome.inventory.attack, -3);
}

#[test]
fn test_negative_gap_draws_nothing() {
    let outcome = run(
        Inventory::new(10, 20, 0),
        &[-2, 1],
        agnostic(CounterId::Attack),
    );

    assert!(outcome.is_completed());
    assert_eq!(outcome.steps[0].adjustment, Adjustment::None);
    assert_eq!(
        outcome.steps[1].adjustment,
        Adjustment::Skip {
            counter: CounterId::Critical,
            amount: 6,
        }
    );
}

#[test]
fn test_planner_steps_one_event_at_a_time() {
    let mut planner = Planner::new(request(
        Inventory::new(30, 12, 9),
        &[1, 4],
        agnostic(CounterId::Attack),
    ));
    assert_eq!(planner.state(), &PlannerState::Running(0));
    assert_eq!(planner.adjustment_counter(), CounterId::Critical);

    assert_eq!(planner.step(), &PlannerState::Running(1));
    assert_eq!(planner.inventory(), &Inventory::new(27, 12, 9));

    assert_eq!(planner.step(), &PlannerState::Completed);
    assert_eq!(planner.steps().len(), 2);

    // Further steps are no-ops.
    assert_eq!(planner.step(), &PlannerState::Completed);
    assert_eq!(planner.steps().len(), 2);
}

#[test]
fn test_empty_plan_is_immediately_complete() {
    let planner = Planner::new(request(
        Inventory::new(1, 1, 1),
        &[],
        agnostic(CounterId::Element),
    ));
    assert_eq!(planner.state(), &PlannerState::Completed);
    let outcome = planner.run();
    assert!(outcome.is_completed());
    assert!(outcome.steps.is_empty());
}

#[test]
fn test_hand_built_extreme_request_does_not_panic() {
    let outcome = run(
        Inventory::new(i64::MIN + 1, 0, 0),
        &[i64::MIN, i64::MAX],
        agnostic(CounterId::Attack),
    );
    assert_eq!(
        outcome.halt.as_ref().map(SimulationError::kind),
        Some(ErrorKind::TargetShortfall)
    );
    assert_eq!(outcome.inventory.attack, i64::MIN);
}
