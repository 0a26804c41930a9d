//! Cost functions for changepoint detection.
//!
//! Cost functions evaluate the "cost" of fitting a model to a segment of data.
//! Lower cost indicates a better fit. Every model here precomputes prefix sums
//! once per sequence so that any segment `[start, end)` is scored in O(1).

use serde::{Deserialize, Serialize};

use crate::error::{ChangepointError, Result};
use crate::utils::{cumulative_sum, mean, population_variance, validate_finite};

/// Smallest variance used inside a log-likelihood before it is clamped.
pub const VARIANCE_FLOOR: f64 = 1e-10;

/// Right-open interval `[start, end)` over sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of samples covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check `0 <= start < end <= len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.start >= self.end || self.end > len {
            return Err(ChangepointError::InvalidSegment {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

/// A cost model built over one sequence.
///
/// Implementations are immutable once built and are safe to share between
/// threads.
pub trait SegmentCost {
    /// Number of samples the model was built over.
    fn n_samples(&self) -> usize;

    /// Cost of the segment `[start, end)`.
    ///
    /// Callers must guarantee `start < end <= n_samples()`; this is only
    /// checked in debug builds. Use [`SegmentCost::checked_cost`] for
    /// untrusted bounds.
    fn cost(&self, start: usize, end: usize) -> f64;

    /// Cost of `segment`, failing with [`ChangepointError::InvalidSegment`]
    /// when it lies outside the sequence or is empty.
    fn checked_cost(&self, segment: Segment) -> Result<f64> {
        segment.validate(self.n_samples())?;
        Ok(self.cost(segment.start, segment.end))
    }
}

/// Cost function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    /// Gaussian mean shift with known (or estimated) variance.
    #[default]
    NormalMean,
    /// Gaussian variance shift with known (or estimated) mean.
    NormalVar,
    /// Joint Gaussian mean and variance shift.
    NormalMeanVar,
    /// Poisson rate shift for count data.
    Poisson,
    /// Exponential rate shift for positive waiting times.
    Exponential,
}

// ==================== normal mean ====================

/// Gaussian mean-shift cost.
///
/// `cost(s, e) = (S2 - S^2 / n) / variance^2` where `S` and `S2` are the sum
/// and sum of squares of the segment. This is the negative log-likelihood of a
/// constant-mean segment up to an additive constant, and is never negative.
#[derive(Debug, Clone)]
pub struct NormalMeanCost {
    cum_sum: Vec<f64>,
    cum_sum_sq: Vec<f64>,
    variance: f64,
    inverse_variance_squared: f64,
}

impl NormalMeanCost {
    /// Build the cost over `series`.
    ///
    /// With `variance = None` the population variance of `series` is used;
    /// constant input falls back to `1.0`.
    pub fn new(series: &[f64], variance: Option<f64>) -> Result<Self> {
        validate_finite(series)?;

        let variance = match variance {
            Some(v) if v.is_finite() && v > 0.0 => v,
            Some(v) => {
                return Err(ChangepointError::InvalidParameter(format!(
                    "variance must be finite and positive, got {v}"
                )))
            }
            None => estimate_variance(series)?,
        };
        let inverse_variance_squared = 1.0 / (variance * variance);
        if !inverse_variance_squared.is_finite() {
            return Err(ChangepointError::InvalidParameter(format!(
                "variance {variance} is too small to square without underflow"
            )));
        }

        // Centre before accumulating; the cost is shift invariant.
        let center = mean(series);
        let cum_sum = cumulative_sum(series, |x| x - center);
        let cum_sum_sq = cumulative_sum(series, |x| (x - center) * (x - center));
        ensure_finite_sums(&cum_sum_sq, "squared deviations")?;

        Ok(Self {
            cum_sum,
            cum_sum_sq,
            variance,
            inverse_variance_squared,
        })
    }

    /// Variance the cost is scaled by.
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

impl SegmentCost for NormalMeanCost {
    fn n_samples(&self) -> usize {
        self.cum_sum.len() - 1
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(
            start < end && end <= self.n_samples(),
            "invalid segment [{start}, {end})"
        );
        let n = (end - start) as f64;
        let sum = self.cum_sum[end] - self.cum_sum[start];
        let sum_sq = self.cum_sum_sq[end] - self.cum_sum_sq[start];
        (sum_sq - sum * sum / n).max(0.0) * self.inverse_variance_squared
    }
}

fn estimate_variance(series: &[f64]) -> Result<f64> {
    let v = population_variance(series);
    if !v.is_finite() {
        return Err(ChangepointError::InvalidInput(format!(
            "sample variance overflows: {v}"
        )));
    }
    Ok(if v > VARIANCE_FLOOR { v } else { 1.0 })
}

/// Reject prefix sums whose running total left the finite range.
fn ensure_finite_sums(prefix: &[f64], what: &str) -> Result<()> {
    match prefix.last() {
        Some(total) if !total.is_finite() => Err(ChangepointError::InvalidInput(format!(
            "sum of {what} overflows: {total}"
        ))),
        _ => Ok(()),
    }
}

// ==================== normal variance ====================

/// Gaussian variance-shift cost around a fixed mean.
///
/// `cost(s, e) = n * ln(D / n)` where `D` is the sum of squared deviations
/// from the mean over the segment.
#[derive(Debug, Clone)]
pub struct NormalVarCost {
    cum_dev_sq: Vec<f64>,
    mean: f64,
}

impl NormalVarCost {
    /// Build the cost over `series`. With `mean = None` the sample mean is used.
    pub fn new(series: &[f64], mean: Option<f64>) -> Result<Self> {
        validate_finite(series)?;

        let mean = match mean {
            Some(m) if m.is_finite() => m,
            Some(m) => {
                return Err(ChangepointError::InvalidParameter(format!(
                    "mean must be finite, got {m}"
                )))
            }
            None => crate::utils::mean(series),
        };

        let cum_dev_sq = cumulative_sum(series, |x| (x - mean) * (x - mean));
        ensure_finite_sums(&cum_dev_sq, "squared deviations")?;

        Ok(Self { cum_dev_sq, mean })
    }

    /// Mean the deviations are measured from.
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl SegmentCost for NormalVarCost {
    fn n_samples(&self) -> usize {
        self.cum_dev_sq.len() - 1
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(
            start < end && end <= self.n_samples(),
            "invalid segment [{start}, {end})"
        );
        let n = (end - start) as f64;
        let dev = (self.cum_dev_sq[end] - self.cum_dev_sq[start]) / n;
        n * dev.max(VARIANCE_FLOOR).ln()
    }
}

// ==================== normal mean + variance ====================

/// Joint Gaussian mean and variance cost.
///
/// `cost(s, e) = n * (1 + ln(sigma^2))` with `sigma^2` the population variance
/// of the segment.
#[derive(Debug, Clone)]
pub struct NormalMeanVarCost {
    cum_sum: Vec<f64>,
    cum_sum_sq: Vec<f64>,
}

impl NormalMeanVarCost {
    pub fn new(series: &[f64]) -> Result<Self> {
        validate_finite(series)?;

        let center = mean(series);
        let cum_sum_sq = cumulative_sum(series, |x| (x - center) * (x - center));
        ensure_finite_sums(&cum_sum_sq, "squared deviations")?;

        Ok(Self {
            cum_sum: cumulative_sum(series, |x| x - center),
            cum_sum_sq,
        })
    }
}

impl SegmentCost for NormalMeanVarCost {
    fn n_samples(&self) -> usize {
        self.cum_sum.len() - 1
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(
            start < end && end <= self.n_samples(),
            "invalid segment [{start}, {end})"
        );
        let n = (end - start) as f64;
        let sum = self.cum_sum[end] - self.cum_sum[start];
        let sum_sq = self.cum_sum_sq[end] - self.cum_sum_sq[start];
        let variance = ((sum_sq - sum * sum / n) / n).max(VARIANCE_FLOOR);
        n * (1.0 + variance.ln())
    }
}

// ==================== poisson ====================

/// Poisson rate cost for non-negative counts.
///
/// `cost(s, e) = -2 * S * (ln(S) - ln(n) - 1)`, and `0` when `S == 0`.
#[derive(Debug, Clone)]
pub struct PoissonCost {
    cum_sum: Vec<f64>,
}

impl PoissonCost {
    pub fn new(series: &[f64]) -> Result<Self> {
        validate_finite(series)?;
        if let Some((index, x)) = series.iter().enumerate().find(|&(_, &x)| x < 0.0) {
            return Err(ChangepointError::InvalidInput(format!(
                "poisson cost requires non-negative counts, got {x} at index {index}"
            )));
        }

        let cum_sum = cumulative_sum(series, |x| x);
        ensure_finite_sums(&cum_sum, "samples")?;

        Ok(Self { cum_sum })
    }
}

impl SegmentCost for PoissonCost {
    fn n_samples(&self) -> usize {
        self.cum_sum.len() - 1
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(
            start < end && end <= self.n_samples(),
            "invalid segment [{start}, {end})"
        );
        let n = (end - start) as f64;
        let sum = self.cum_sum[end] - self.cum_sum[start];
        if sum <= 0.0 {
            return 0.0;
        }
        -2.0 * sum * (sum.ln() - n.ln() - 1.0)
    }
}

// ==================== exponential ====================

/// Exponential rate cost for strictly positive samples.
///
/// `cost(s, e) = -n * (ln(n) - ln(S))`.
#[derive(Debug, Clone)]
pub struct ExponentialCost {
    cum_sum: Vec<f64>,
}

impl ExponentialCost {
    pub fn new(series: &[f64]) -> Result<Self> {
        validate_finite(series)?;
        if let Some((index, x)) = series.iter().enumerate().find(|&(_, &x)| x <= 0.0) {
            return Err(ChangepointError::InvalidInput(format!(
                "exponential cost requires positive values, got {x} at index {index}"
            )));
        }

        let cum_sum = cumulative_sum(series, |x| x);
        ensure_finite_sums(&cum_sum, "samples")?;

        Ok(Self { cum_sum })
    }
}

impl SegmentCost for ExponentialCost {
    fn n_samples(&self) -> usize {
        self.cum_sum.len() - 1
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(
            start < end && end <= self.n_samples(),
            "invalid segment [{start}, {end})"
        );
        let n = (end - start) as f64;
        let sum = self.cum_sum[end] - self.cum_sum[start];
        -n * (n.ln() - sum.ln())
    }
}

// ==================== dispatch ====================

/// A built cost model of any [`CostKind`].
#[derive(Debug, Clone)]
pub enum CostModel {
    NormalMean(NormalMeanCost),
    NormalVar(NormalVarCost),
    NormalMeanVar(NormalMeanVarCost),
    Poisson(PoissonCost),
    Exponential(ExponentialCost),
}

impl CostModel {
    /// Build the model named by `kind` over `series`, estimating any nuisance
    /// parameter (variance or mean) from the data.
    pub fn build(kind: CostKind, series: &[f64]) -> Result<Self> {
        Ok(match kind {
            CostKind::NormalMean => Self::NormalMean(NormalMeanCost::new(series, None)?),
            CostKind::NormalVar => Self::NormalVar(NormalVarCost::new(series, None)?),
            CostKind::NormalMeanVar => Self::NormalMeanVar(NormalMeanVarCost::new(series)?),
            CostKind::Poisson => Self::Poisson(PoissonCost::new(series)?),
            CostKind::Exponential => Self::Exponential(ExponentialCost::new(series)?),
        })
    }

    pub fn kind(&self) -> CostKind {
        match self {
            Self::NormalMean(_) => CostKind::NormalMean,
            Self::NormalVar(_) => CostKind::NormalVar,
            Self::NormalMeanVar(_) => CostKind::NormalMeanVar,
            Self::Poisson(_) => CostKind::Poisson,
            Self::Exponential(_) => CostKind::Exponential,
        }
    }
}

impl SegmentCost for CostModel {
    fn n_samples(&self) -> usize {
        match self {
            Self::NormalMean(c) => c.n_samples(),
            Self::NormalVar(c) => c.n_samples(),
            Self::NormalMeanVar(c) => c.n_samples(),
            Self::Poisson(c) => c.n_samples(),
            Self::Exponential(c) => c.n_samples(),
        }
    }

    fn cost(&self, start: usize, end: usize) -> f64 {
        match self {
            Self::NormalMean(c) => c.cost(start, end),
            Self::NormalVar(c) => c.cost(start, end),
            Self::NormalMeanVar(c) => c.cost(start, end),
            Self::Poisson(c) => c.cost(start, end),
            Self::Exponential(c) => c.cost(start, end),
        }
    }
}

/// Sum of segment costs over a boundary list `[0, b_1, ..., n]`.
///
/// Fails with [`ChangepointError::InvalidSegment`] if consecutive boundaries
/// are not strictly increasing or run past the sequence.
pub fn total_cost<C: SegmentCost + ?Sized>(model: &C, boundaries: &[usize]) -> Result<f64> {
    boundaries
        .windows(2)
        .map(|w| model.checked_cost(Segment::new(w[0], w[1])))
        .sum()
}
