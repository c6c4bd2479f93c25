//! Estimation error kinds.
//!
//! None of these are recovered from automatically. A rejected call leaves
//! the filter state untouched; a singular covariance is fatal to the running
//! estimation session until the caller reinitialises the filter, accepting a
//! discontinuity in the trajectory.

use thiserror::Error;

/// Failures surfaced by the estimator and the fusion cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationError {
    /// A measurement vector of the wrong size was supplied.
    #[error("measurement has {actual} rows, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The uncertainty model is degenerate: a covariance could not be
    /// factorised for inversion.
    #[error("covariance is singular or indefinite")]
    SingularCovariance,

    /// A NaN or infinite value reached the estimator. Once such a value
    /// enters the state it cannot be corrected out again, so it is rejected
    /// at the boundary.
    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),
}

/// Result type for estimation operations.
pub type EstimationResult<T> = Result<T, EstimationError>;
