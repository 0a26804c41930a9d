#![allow(dead_code)]

pub mod synthetic_series;

use pelt_changepoint::changepoint::SegmentCost;

/// O(n^2) optimal partitioning with no pruning and no length constraint.
///
/// Returns `F[n]`, the minimal total cost plus one penalty per changepoint.
pub fn naive_objective<C: SegmentCost>(model: &C, penalty: f64) -> f64 {
    let n = model.n_samples();
    let mut f = vec![f64::INFINITY; n + 1];
    f[0] = -penalty;
    for t in 1..=n {
        f[t] = (0..t)
            .map(|s| f[s] + model.cost(s, t) + penalty)
            .fold(f64::INFINITY, f64::min);
    }
    f[n]
}
