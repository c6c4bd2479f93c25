//! Numerical implementations of the estimation operations.

pub mod covariance;
