//! Flight state estimation by dead reckoning.
//!
//! Noisy onboard readings of a small aerial vehicle (an absolute altitude,
//! orientation angles and a body-frame velocity) are fused into a single
//! filtered state by a linear Kalman filter. Each tick the body velocity is
//! rotated into the world frame and integrated over the elapsed time; the
//! resulting displacement joins the altitude in a four-row measurement that
//! corrects a six-dimensional position/velocity state.
//!
//! The state representation is a struct, models are structs pairing a model
//! matrix with its additive noise, and the estimation operations are
//! implemented on the state representation. [`fusion::DeadReckoner`] drives
//! one predict/correct cycle per telemetry snapshot and owns the tick clock.
//!
//! The core is pure and synchronous: the vehicle link that produces
//! telemetry and the display that consumes positions are external
//! collaborators, connected only through [`fusion::Telemetry`] in and a
//! world-frame position out.
//!
//! # Licensing
//!
//! Distributed under the terms of the MIT license.
//!
//! [`fusion::DeadReckoner`]: fusion/struct.DeadReckoner.html
//! [`fusion::Telemetry`]: fusion/struct.Telemetry.html

pub mod error;
pub mod estimators;
pub mod frame;
pub mod fusion;
pub mod linalg;
pub mod models;
