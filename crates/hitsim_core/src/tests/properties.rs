use super::*;

const PLANS: &[&[i64]] = &[&[1], &[1, 2, 3], &[2, 9, 10, 40], &[7, 8, 100]];

#[test]
fn test_interval_length_and_sum_match_plan() {
    for &positions in PLANS {
        let gaps = intervals(positions);
        assert_eq!(gaps.len(), positions.len());
        assert_eq!(gaps.iter().sum::<i64>(), *positions.last().unwrap());
    }
}

#[test]
fn test_label_pairing_independent_of_input_order() {
    let forward = RawInput {
        hits: "1,4,6".to_string(),
        labels: "sword,bow,axe".to_string(),
        ..base_raw()
    };
    let shuffled = RawInput {
        hits: "6,1,4".to_string(),
        labels: "axe,sword,bow".to_string(),
        ..base_raw()
    };
    assert_eq!(
        normalize(&forward).unwrap().plan,
        normalize(&shuffled).unwrap().plan
    );
}

#[test]
fn test_all_zero_inventory_regardless_of_other_inputs() {
    for target in CounterId::ALL {
        for hits in ["", "1", "3,5,3", "0"] {
            let input = raw(Inventory::new(0, 0, 0), hits, target);
            assert_eq!(normalize(&input), Err(SimulationError::AllZeroInventory));
        }
    }
}

#[test]
fn test_identical_requests_produce_identical_outcomes() {
    let first = simulate_raw(&base_raw()).unwrap();
    let second = simulate_raw(&base_raw()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_step_count_matches_plan_when_completed() {
    for &positions in PLANS {
        let outcome = run(
            Inventory::new(1000, 1000, 1000),
            positions,
            agnostic(CounterId::Critical),
        );
        assert!(outcome.is_completed());
        assert_eq!(outcome.steps.len(), positions.len());
        for (step, &position) in outcome.steps.iter().zip(positions.iter()) {
            assert_eq!(step.hit_ordinal, position);
        }
    }
}

#[test]
fn test_error_serializes_with_kind_tag() {
    let err = SimulationError::DuplicateHit { position: 3 };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "duplicate_hit");
    assert_eq!(json["position"], 3);
    assert_eq!(err.kind(), ErrorKind::DuplicateHit);
    assert!(!err.is_shortfall());
}
