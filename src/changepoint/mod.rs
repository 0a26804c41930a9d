//! Changepoint detection algorithms.
//!
//! Provides methods to detect structural changes in time series.
//!
//! # Available Algorithms
//!
//! - **PELT**: Pruned Exact Linear Time - exact method with O(n) average complexity
//!
//! # Cost Functions
//!
//! - **NormalMean**: Gaussian mean shift with known or estimated variance (default)
//! - **NormalVar**: Gaussian variance shift around a fixed mean
//! - **NormalMeanVar**: Joint mean and variance changes
//! - **Poisson**: For count data
//! - **Exponential**: For positive waiting times
//!
//! # Example
//!
//! ```
//! use pelt_changepoint::changepoint::{pelt_detect, solve, CostKind, PeltConfig};
//!
//! // Create series with a level shift
//! let mut series = vec![0.0; 50];
//! series.extend(vec![10.0; 50]);
//!
//! // Boundaries include both ends of the series
//! let boundaries = solve(&series, Some(1.0)).unwrap();
//! assert_eq!(boundaries, vec![0, 50, 100]);
//!
//! // Joint mean/variance model with an explicit penalty
//! let config = PeltConfig::default()
//!     .cost_function(CostKind::NormalMeanVar)
//!     .penalty(10.0);
//! let result = pelt_detect(&series, &config).unwrap();
//! assert_eq!(result.changepoints, vec![50]);
//! ```

pub mod cost;
pub mod pelt;

pub use cost::{
    total_cost, CostKind, CostModel, ExponentialCost, NormalMeanCost, NormalMeanVarCost,
    NormalVarCost, PoissonCost, Segment, SegmentCost, VARIANCE_FLOOR,
};
pub use pelt::{pelt_detect, solve, Penalty, PeltConfig, PeltResult, PeltSolver, PruningStats};
