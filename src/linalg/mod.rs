//! Numeric hygiene support for the estimators.

pub mod rcond;
