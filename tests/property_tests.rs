//! Property-based tests for the PELT solver and cost models.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

mod common;

use common::naive_objective;
use pelt_changepoint::changepoint::{
    solve, NormalMeanCost, Penalty, PeltConfig, PeltSolver, Segment, SegmentCost,
};
use proptest::prelude::*;

/// Strategy for generating valid series values.
fn values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0..100.0_f64, min_len..max_len)
}

/// Strategy for piecewise-constant series with a small wobble.
fn stepped_strategy(max_steps: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-20.0..20.0_f64, 3usize..30), 1..max_steps).prop_map(|steps| {
        steps
            .into_iter()
            .flat_map(|(level, len)| {
                (0..len).map(move |i| level + ((i * 7 + 3) % 5) as f64 * 0.05)
            })
            .collect()
    })
}

// =============================================================================
// Property: boundaries are strictly ascending and span [0, n]
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn boundaries_are_strictly_ascending(
        values in values_strategy(2, 150),
        penalty in prop::option::of(0.01..50.0_f64),
    ) {
        let boundaries = solve(&values, penalty).unwrap();

        prop_assert_eq!(boundaries.first().copied(), Some(0));
        prop_assert_eq!(boundaries.last().copied(), Some(values.len()));
        for pair in boundaries.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn solve_is_deterministic(values in stepped_strategy(6)) {
        prop_assume!(values.len() >= 2);
        let first = solve(&values, None).unwrap();
        let second = solve(&values, None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn segments_respect_min_length(
        values in values_strategy(10, 120),
        min_len in 1usize..6,
        penalty in 0.01..10.0_f64,
    ) {
        let model = NormalMeanCost::new(&values, Some(1.0)).unwrap();
        let solver = PeltSolver::new(
            PeltConfig::default().penalty(penalty).min_segment_length(min_len),
        )
        .unwrap();
        let result = solver.solve(&model).unwrap();

        prop_assert_eq!(result.segments.len(), result.n_changepoints + 1);
        for &(start, end) in &result.segments {
            prop_assert!(end - start >= min_len);
        }
    }
}

// =============================================================================
// Property: normal-mean cost is non-negative
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn normal_mean_cost_is_non_negative(
        values in values_strategy(1, 80),
        variance in prop::option::of(0.01..100.0_f64),
        a in 0usize..80,
        b in 0usize..80,
    ) {
        let model = NormalMeanCost::new(&values, variance).unwrap();
        let n = values.len();
        let start = a % n;
        let end = start + 1 + b % (n - start);

        let cost = model.checked_cost(Segment::new(start, end)).unwrap();
        prop_assert!(cost >= 0.0);
    }
}

// =============================================================================
// Property: pruning is exact and penalties act monotonically
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pruned_solution_matches_unpruned(
        values in stepped_strategy(5),
        penalty in 0.1..20.0_f64,
    ) {
        prop_assume!(values.len() >= 2);
        let model = NormalMeanCost::new(&values, Some(1.0)).unwrap();
        let solver = PeltSolver::new(
            PeltConfig::default().penalty(penalty).min_segment_length(1),
        )
        .unwrap();
        let result = solver.solve(&model).unwrap();

        let objective = result.cost + result.n_changepoints as f64 * result.penalty;
        let expected = naive_objective(&model, penalty);
        prop_assert!((objective - expected).abs() <= 1e-6 * expected.abs().max(1.0));
    }

    #[test]
    fn larger_penalty_never_adds_changepoints(
        values in values_strategy(4, 100),
        low in 0.05..10.0_f64,
        factor in 1.0..10.0_f64,
    ) {
        let model = NormalMeanCost::new(&values, Some(10.0)).unwrap();
        let count = |penalty: f64| {
            PeltSolver::new(
                PeltConfig::default()
                    .penalty_kind(Penalty::Manual(penalty))
                    .min_segment_length(1),
            )
            .unwrap()
            .solve(&model)
            .unwrap()
            .n_changepoints
        };

        prop_assert!(count(low * factor) <= count(low));
    }
}
