//! Error types for the pelt-changepoint library.

use thiserror::Error;

/// Result type alias for changepoint operations.
pub type Result<T> = std::result::Result<T, ChangepointError>;

/// Broad failure category of a [`ChangepointError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input sequence cannot be segmented (too short, empty, non-finite samples).
    InvalidInput,
    /// A caller-supplied parameter (penalty, variance, ...) is out of range.
    InvalidParameter,
    /// A cost function was asked for a segment outside `0 <= start < end <= n`.
    InvalidSegment,
    /// The computation produced a non-finite value.
    Computation,
}

/// Errors that can occur during changepoint detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChangepointError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A sample is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// Input violates the domain of the chosen cost model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Segment bounds outside `0 <= start < end <= len`.
    #[error("invalid segment [{start}, {end}) for sequence of length {len}")]
    InvalidSegment { start: usize, end: usize, len: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ChangepointError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyData
            | Self::InsufficientData { .. }
            | Self::NonFiniteValue { .. }
            | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::InvalidSegment { .. } => ErrorKind::InvalidSegment,
            Self::ComputationError(_) => ErrorKind::Computation,
        }
    }
}
