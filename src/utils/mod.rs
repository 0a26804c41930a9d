//! Utility functions shared by the cost models.

pub mod stats;

pub use stats::{cumulative_sum, mean, population_variance, validate_finite};
