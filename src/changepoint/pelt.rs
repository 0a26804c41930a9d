//! PELT (Pruned Exact Linear Time) algorithm for changepoint detection.
//!
//! An exact method for detecting multiple changepoints with O(n) average complexity.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::cost::{total_cost, CostKind, CostModel, NormalMeanCost, SegmentCost};
use crate::error::{ChangepointError, Result};

/// Per-segment penalty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    /// BIC-style penalty `ln(n)` where n is the series length.
    #[default]
    Bic,
    /// AIC-style penalty `2`.
    Aic,
    /// Fixed value; must be finite and positive.
    Manual(f64),
}

impl Penalty {
    /// Resolve to a scalar for a series of length `n`.
    pub fn resolve(&self, n: usize) -> Result<f64> {
        let value = match *self {
            Penalty::Bic => (n as f64).ln(),
            Penalty::Aic => 2.0,
            Penalty::Manual(value) => value,
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ChangepointError::InvalidParameter(format!(
                "penalty must be finite and positive, got {value}"
            )));
        }
        Ok(value)
    }
}

/// Configuration for PELT algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeltConfig {
    /// Cost function to use
    pub cost_fn: CostKind,
    /// Penalty for each changepoint (controls number of changepoints)
    pub penalty: Penalty,
    /// Minimum segment length
    pub min_segment_length: usize,
}

impl Default for PeltConfig {
    fn default() -> Self {
        Self {
            cost_fn: CostKind::NormalMean,
            penalty: Penalty::Bic,
            min_segment_length: 2,
        }
    }
}

impl PeltConfig {
    /// Create a new config with BIC penalty.
    ///
    /// BIC penalty = log(n) where n is the series length.
    pub fn with_bic_penalty() -> Self {
        Self {
            penalty: Penalty::Bic,
            ..Default::default()
        }
    }

    /// Create a new config with AIC penalty.
    ///
    /// AIC penalty = 2.
    pub fn with_aic_penalty() -> Self {
        Self {
            penalty: Penalty::Aic,
            ..Default::default()
        }
    }

    /// Set the cost function.
    pub fn cost_function(mut self, cost_fn: CostKind) -> Self {
        self.cost_fn = cost_fn;
        self
    }

    /// Set a fixed penalty.
    pub fn penalty(mut self, penalty: f64) -> Self {
        self.penalty = Penalty::Manual(penalty);
        self
    }

    /// Set the penalty rule.
    pub fn penalty_kind(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set minimum segment length.
    pub fn min_segment_length(mut self, min_len: usize) -> Self {
        self.min_segment_length = min_len.max(1);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min_segment_length == 0 {
            return Err(ChangepointError::InvalidParameter(
                "min_segment_length must be >= 1".to_string(),
            ));
        }
        if let Penalty::Manual(_) = self.penalty {
            // Series length does not enter a manual penalty.
            self.penalty.resolve(0)?;
        }
        Ok(())
    }
}

/// Work done by one PELT run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruningStats {
    /// Segment cost evaluations performed.
    pub cost_evaluations: usize,
    /// Candidates discarded by the pruning rule.
    pub candidates_pruned: usize,
    /// Largest candidate set seen.
    pub max_candidates: usize,
}

/// Result of PELT changepoint detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeltResult {
    /// Segment boundaries `[0, cp_1, ..., cp_k, n]`, strictly ascending
    pub boundaries: Vec<usize>,
    /// Detected changepoint indices (interior boundaries)
    pub changepoints: Vec<usize>,
    /// Segment boundaries (start, end) pairs
    pub segments: Vec<(usize, usize)>,
    /// Total cost (excluding penalty)
    pub cost: f64,
    /// Resolved per-segment penalty
    pub penalty: f64,
    /// Number of changepoints
    pub n_changepoints: usize,
    /// Pruning statistics
    pub stats: PruningStats,
}

impl PeltResult {
    /// Get the segment containing a specific index.
    pub fn segment_for_index(&self, index: usize) -> Option<(usize, usize)> {
        self.segments.iter().find(|&&(start, end)| index >= start && index < end).copied()
    }

    /// Get segment means.
    pub fn segment_means(&self, series: &[f64]) -> Vec<f64> {
        self.segments
            .iter()
            .map(|&(start, end)| match series.get(start..end) {
                Some(segment) if !segment.is_empty() => {
                    segment.iter().sum::<f64>() / segment.len() as f64
                }
                _ => f64::NAN,
            })
            .collect()
    }
}

/// Candidate "last changepoint" positions, in ascending index order.
///
/// Both buffers are allocated once per run and compacted in place.
struct CandidateSet {
    indices: Vec<usize>,
    scores: Vec<f64>,
}

impl CandidateSet {
    fn new(capacity: usize) -> Self {
        let mut indices = Vec::with_capacity(capacity);
        indices.push(0);
        Self {
            indices,
            scores: Vec::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    /// Score every candidate as `f[s] + cost(s, t)` and return the first
    /// minimiser with its score.
    fn score<C: SegmentCost + ?Sized>(
        &mut self,
        f: &[f64],
        model: &C,
        t: usize,
    ) -> Result<(usize, f64)> {
        self.scores.clear();
        let mut best: Option<(usize, f64)> = None;

        for &s in &self.indices {
            let segment_cost = model.cost(s, t);
            if !segment_cost.is_finite() {
                return Err(ChangepointError::ComputationError(format!(
                    "non-finite segment cost at [{s}, {t}): {segment_cost}"
                )));
            }
            let score = f[s] + segment_cost;
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((s, score));
            }
            self.scores.push(score);
        }

        match best {
            Some((tau, score)) if score.is_finite() => Ok((tau, score)),
            _ => Err(ChangepointError::ComputationError(format!(
                "no feasible segmentation ends at t={t}"
            ))),
        }
    }

    /// Keep only candidates whose last score is below `threshold`; returns the
    /// number removed. Must follow [`CandidateSet::score`].
    fn prune(&mut self, threshold: f64) -> usize {
        let before = self.indices.len();
        let mut write = 0;
        for read in 0..before {
            if self.scores[read] < threshold {
                self.indices[write] = self.indices[read];
                write += 1;
            }
        }
        self.indices.truncate(write);
        before - write
    }

    fn push(&mut self, index: usize) {
        self.indices.push(index);
    }
}

/// PELT solver over any [`SegmentCost`].
#[derive(Debug, Clone)]
pub struct PeltSolver {
    config: PeltConfig,
}

impl PeltSolver {
    /// Create a solver, validating the penalty and minimum segment length.
    pub fn new(config: PeltConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration the solver was validated with.
    pub fn config(&self) -> &PeltConfig {
        &self.config
    }

    /// Find the optimal penalised segmentation of the sequence behind `model`.
    ///
    /// `config.cost_fn` is ignored here; the supplied model is used as is.
    pub fn solve<C: SegmentCost + ?Sized>(&self, model: &C) -> Result<PeltResult> {
        let n = model.n_samples();
        let min_len = self.config.min_segment_length;
        let needed = min_len.max(2);
        if n < needed {
            return Err(ChangepointError::InsufficientData { needed, got: n });
        }
        let penalty = self.config.penalty.resolve(n)?;

        debug!("pelt: n={n} penalty={penalty:.4} min_segment_length={min_len}");

        // f[t] = minimum penalised cost of segmenting series[0..t]
        let mut f = vec![f64::INFINITY; n + 1];
        f[0] = -penalty;
        // backtrace[t] = optimal last changepoint for series[0..t]
        let mut backtrace = vec![0usize; n + 1];
        let mut candidates = CandidateSet::new(n + 1);
        let mut stats = PruningStats::default();

        for t in min_len..=n {
            stats.max_candidates = stats.max_candidates.max(candidates.len());
            stats.cost_evaluations += candidates.len();

            let (tau, best) = candidates.score(&f, model, t)?;
            f[t] = best + penalty;
            backtrace[t] = tau;

            let pruned = candidates.prune(f[t]);
            if pruned > 0 {
                trace!("pelt: t={t} pruned {pruned}, {} remain", candidates.len());
            }
            stats.candidates_pruned += pruned;

            // Becomes admissible at t + 1, leaving at least `min_len` samples.
            candidates.push(t + 1 - min_len);
        }

        let boundaries = backtrack(&backtrace, n)?;
        let changepoints = boundaries[1..boundaries.len() - 1].to_vec();
        let segments: Vec<(usize, usize)> = boundaries.windows(2).map(|w| (w[0], w[1])).collect();
        let cost = total_cost(model, &boundaries)?;

        debug!(
            "pelt: changepoints={changepoints:?} cost_evaluations={} pruned={} max_candidates={}",
            stats.cost_evaluations, stats.candidates_pruned, stats.max_candidates
        );

        Ok(PeltResult {
            n_changepoints: changepoints.len(),
            boundaries,
            changepoints,
            segments,
            cost,
            penalty,
            stats,
        })
    }
}

/// Walk `backtrace` from `n` down to `0`, returning `[0, ..., n]` ascending.
fn backtrack(backtrace: &[usize], n: usize) -> Result<Vec<usize>> {
    let mut boundaries = vec![n];
    let mut cursor = n;
    while cursor > 0 {
        let prev = backtrace[cursor];
        if prev >= cursor {
            return Err(ChangepointError::ComputationError(format!(
                "backtrace does not decrease at t={cursor} (points to {prev})"
            )));
        }
        boundaries.push(prev);
        cursor = prev;
    }
    boundaries.reverse();
    Ok(boundaries)
}

/// Detect changepoints using the PELT algorithm.
///
/// Builds the cost model named by `config.cost_fn` over `series` and solves.
///
/// # Arguments
/// * `series` - Input time series
/// * `config` - PELT configuration
pub fn pelt_detect(series: &[f64], config: &PeltConfig) -> Result<PeltResult> {
    let solver = PeltSolver::new(config.clone())?;
    let model = CostModel::build(config.cost_fn, series)?;
    solver.solve(&model)
}

/// Segment boundaries of `series` under a Gaussian mean-shift model.
///
/// The noise variance is estimated from the data and `penalty` defaults to
/// `ln(n)`. Returns `[0, cp_1, ..., cp_k, n]` in ascending order.
///
/// # Errors
/// * Fewer than two samples, or any non-finite sample.
/// * An explicit penalty that is not finite and positive.
pub fn solve(series: &[f64], penalty: Option<f64>) -> Result<Vec<usize>> {
    let penalty = penalty.map_or(Penalty::Bic, Penalty::Manual);
    let solver = PeltSolver::new(PeltConfig::default().penalty_kind(penalty))?;
    let model = NormalMeanCost::new(series, None)?;
    Ok(solver.solve(&model)?.boundaries)
}
