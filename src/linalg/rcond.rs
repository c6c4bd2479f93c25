//! Reciprocal condition number estimation.
//!
//! Cheap conditioning checks used to validate a covariance before it is
//! trusted for estimation.

use nalgebra::Matrix6;

use crate::error::{EstimationError, EstimationResult};

/// Estimates the reciprocal condition number of a symmetric positive
/// semi-definite matrix for inversion.
///
/// The norm of the matrix is taken as its largest diagonal element and the
/// norm of the inverse as the reciprocal of the smallest, so
/// rcond = min/max with rcond <= 1. Defined as 0 for a semi-definite or
/// infinite-normed matrix and negative for a negative or NaN diagonal, so a
/// caller can test validity with a single comparison.
pub fn rcond_symmetric(m: &Matrix6<f64>) -> f64 {
    let mut mind = m[(0, 0)];
    let mut maxd = mind;
    for i in 0..6 {
        let d = m[(i, i)];
        // NaN comparisons are false, catch them explicitly
        if d.is_nan() || d < 0.0 {
            return -1.0;
        }
        if d < mind {
            mind = d;
        }
        if d > maxd {
            maxd = d;
        }
    }
    if maxd == 0.0 || maxd.is_infinite() {
        0.0
    } else {
        mind / maxd
    }
}

/// Checks that an estimated reciprocal condition number is non-negative,
/// i.e. the matrix it was estimated from is usable as a positive
/// semi-definite covariance.
pub fn check_non_negative(rcond: f64) -> EstimationResult<f64> {
    if rcond >= 0.0 {
        Ok(rcond)
    } else {
        Err(EstimationError::SingularCovariance)
    }
}
