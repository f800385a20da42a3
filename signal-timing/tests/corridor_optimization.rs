// Green-wave optimization over the 4-intersection demo corridor

use approx::assert_relative_eq;
use signal_timing::optimizer::{score_forward, score_reverse};
use signal_timing::{
    signal_state, Intersection, Light, OffsetOptimizer, OptimizerConfig, ScenarioKind, SignalTimingError,
};
use std::collections::HashSet;

fn corridor() -> Vec<Intersection> {
    vec![
        Intersection::new(1, "수청4R", 160, 145, 120.0, 0.0),
        Intersection::new(2, "대천중", 160, 40, 80.0, 214.0),
        Intersection::new(3, "한내초", 160, 130, 131.0, 417.0),
        Intersection::new(4, "흑포", 160, 0, 70.0, 692.0),
    ]
}

#[test]
fn test_end_to_end_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();

    let corridor = corridor();
    let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();

    assert_relative_eq!(result.speed_kmh, 40.0);
    assert_eq!(result.cycle, 160);
    let kinds: Vec<ScenarioKind> = result.scenarios.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, ScenarioKind::ALL.to_vec());

    for scenario in &result.scenarios {
        assert!(!scenario.items.is_empty());
        assert!(scenario.items.len() <= 3);

        let unique: HashSet<&Vec<u32>> = scenario.items.iter().map(|c| &c.offsets).collect();
        assert_eq!(unique.len(), scenario.items.len());

        for (i, item) in scenario.items.iter().enumerate() {
            assert_eq!(item.rank, i + 1);
            assert!(item.offsets.iter().all(|&o| o < 160));
            assert_relative_eq!(item.total_score, item.fwd_score + item.rev_score);
        }
        for pair in scenario.items.windows(2) {
            assert!(scenario.kind.key(&pair[0]) >= scenario.kind.key(&pair[1]));
        }
    }

    let balanced = &result.scenario(ScenarioKind::Balanced).unwrap().items;
    assert!(balanced[0].total_score >= balanced[balanced.len() - 1].total_score);
}

#[test]
fn test_reported_scores_match_rescoring() {
    let corridor = corridor();
    let speed_mps = 40.0 * 1000.0 / 3600.0;
    let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();

    for scenario in &result.scenarios {
        for item in &scenario.items {
            assert_relative_eq!(score_forward(&corridor, &item.offsets, speed_mps), item.fwd_score);
            assert_relative_eq!(score_reverse(&corridor, &item.offsets, speed_mps), item.rev_score);
        }
    }
}

#[test]
fn test_bandwidth_bounded_by_narrowest_green() {
    let corridor = corridor();
    let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();
    let narrowest = corridor.iter().map(|i| i.green).fold(f64::INFINITY, f64::min);

    let forward = &result.scenario(ScenarioKind::Forward).unwrap().items[0];
    let reverse = &result.scenario(ScenarioKind::Reverse).unwrap().items[0];
    assert!(forward.fwd_score > 0.0 && forward.fwd_score <= narrowest);
    assert!(reverse.rev_score > 0.0 && reverse.rev_score <= narrowest);
}

#[test]
fn test_custom_config() {
    let corridor = corridor();
    let config = OptimizerConfig::new().with_top_n(1).with_blend_weights(vec![0.5]);
    let result = OffsetOptimizer::with_config(config).unwrap().optimize(&corridor, 40.0).unwrap();

    assert_eq!(result.candidates_evaluated, 160 * 3);
    assert!(result.scenarios.iter().all(|s| s.items.len() == 1));
}

#[test]
fn test_apply_candidate_then_read_signals() {
    let corridor = corridor();
    let result = OffsetOptimizer::new().optimize(&corridor, 40.0).unwrap();
    let applied = result.scenario(ScenarioKind::Forward).unwrap().items[0].apply_to(&corridor);

    for (inter, original) in applied.iter().zip(&corridor) {
        assert_eq!(inter.id, original.id);
        // Green starts exactly at the offset
        let state = signal_state(inter.offset as f64, inter, 3.0);
        assert_eq!(state.light, Light::Green);
        assert_relative_eq!(state.remaining_s, inter.green);
    }
}

#[test]
fn test_rejects_single_intersection() {
    let corridor = corridor();
    let err = OffsetOptimizer::new().optimize(&corridor[..1], 40.0).unwrap_err();
    assert!(matches!(err, SignalTimingError::TooFewIntersections(1)));
    assert!(err.to_string().contains("2 intersections"));
}
