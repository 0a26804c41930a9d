//! # pelt-changepoint
//!
//! Offline changepoint detection with PELT (Pruned Exact Linear Time).
//!
//! Segment cost models score any `[start, end)` slice of a series in O(1)
//! from prefix sums; the solver runs the penalised dynamic program with the
//! PELT pruning rule and returns the optimal segment boundaries.

#![allow(clippy::needless_range_loop)]

pub mod changepoint;
pub mod error;
pub mod utils;

pub use changepoint::{pelt_detect, solve};
pub use error::{ChangepointError, ErrorKind, Result};

pub mod prelude {
    pub use crate::changepoint::{
        pelt_detect, solve, CostKind, CostModel, NormalMeanCost, Penalty, PeltConfig, PeltResult,
        PeltSolver, SegmentCost,
    };
    pub use crate::error::{ChangepointError, ErrorKind, Result};
}
