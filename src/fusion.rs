//! Per-tick fusion of telemetry into a position estimate.
//!
//! A [`DeadReckoner`] owns the filter state, the constant models and the
//! tick clock. An external loop feeds it one telemetry snapshot per tick
//! and consumes the corrected position; the vehicle link producing the
//! telemetry and the display consuming the positions are collaborators
//! outside this crate.
//!
//! [`DeadReckoner`]: struct.DeadReckoner.html

use std::time::Instant;

use log::{debug, trace, warn};
use nalgebra::{DVector, Vector3};

use crate::error::{EstimationError, EstimationResult};
use crate::frame::{self, Attitude};
use crate::models::{DisplacementCoupling, KalmanState, LinearObserveModel, LinearPredictModel};

/// One telemetry snapshot.
///
/// All readings are assumed to be mutually consistent; no cross-sensor time
/// synchronization is attempted beyond the single elapsed-time delta per
/// tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    /// Absolute altitude in meters.
    pub altitude: f64,
    /// Orientation in radians.
    pub attitude: Attitude,
    /// Body-frame velocity in meters per second.
    pub velocity: Vector3<f64>,
}

/// Estimator tuning, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FusionConfig {
    /// Trust in the model: process noise covariance scale.
    pub process_noise_scale: f64,
    /// Trust in the sensors: measurement noise covariance scale.
    pub measurement_noise_scale: f64,
    /// Initial uncertainty: error covariance scale at start and after reset.
    pub initial_covariance_scale: f64,
    /// Wiring of the displacement rows of the measurement.
    pub coupling: DisplacementCoupling,
}

impl Default for FusionConfig {
    fn default() -> FusionConfig {
        FusionConfig {
            process_noise_scale: 1e-4,
            measurement_noise_scale: 1e-1,
            initial_covariance_scale: 1e-2,
            coupling: DisplacementCoupling::Velocity,
        }
    }
}

/// The per-tick estimation cycle.
///
/// Single-threaded and synchronous: one call to [`step`] runs exactly one
/// predict/correct pair as an atomic unit, and the state is consistent at
/// every tick boundary. Concurrent ticks are never valid: the corrected
/// state of tick N is the starting point of tick N+1.
///
/// [`step`]: #method.step
pub struct DeadReckoner {
    state: KalmanState,
    pred: LinearPredictModel,
    obs: LinearObserveModel,
    config: FusionConfig,
    last_tick: Option<Instant>,
}

impl DeadReckoner {
    pub fn new(config: FusionConfig) -> DeadReckoner {
        DeadReckoner {
            state: KalmanState::new_zero(config.initial_covariance_scale),
            pred: LinearPredictModel::constant_velocity(config.process_noise_scale),
            obs: LinearObserveModel::altitude_displacement(
                config.measurement_noise_scale,
                config.coupling,
            ),
            config,
            last_tick: None,
        }
    }

    /// Runs one estimation tick against the wall clock.
    ///
    /// The elapsed time is the delta between `now` and the previous
    /// invocation. The first invocation has no prior timestamp and uses
    /// zero, so the displacement contribution is zero for that tick while
    /// the altitude still corrects.
    pub fn step(&mut self, sample: &Telemetry, now: Instant) -> EstimationResult<Vector3<f64>> {
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.step_with_elapsed(sample, dt)
    }

    /// Runs one estimation tick with a caller-supplied elapsed time.
    ///
    /// Predicts, rotates the body velocity into a world-frame displacement
    /// over `dt`, assembles the (altitude, dx, dy, dz) measurement and
    /// corrects. Returns the corrected position. Non-finite telemetry or
    /// elapsed time is rejected before the filter is touched; a negative
    /// `dt` is clamped to zero.
    pub fn step_with_elapsed(
        &mut self,
        sample: &Telemetry,
        dt: f64,
    ) -> EstimationResult<Vector3<f64>> {
        validate(sample, dt)?;

        let prior = self.state.predict(&self.pred);
        trace!(
            "a priori ({:.3}, {:.3}, {:.3}) after {:.4}s",
            prior.x[0],
            prior.x[1],
            prior.x[2],
            dt
        );

        let d = frame::world_displacement(sample.velocity, &sample.attitude, dt);
        let z = DVector::from_column_slice(&[sample.altitude, d[0], d[1], d[2]]);
        let corrected = match self.state.correct(&self.obs, &z) {
            Ok(state) => state,
            Err(err) => {
                warn!("correction rejected: {}", err);
                return Err(err);
            }
        };

        let position = corrected.position();
        trace!(
            "corrected ({:.3}, {:.3}, {:.3})",
            position[0],
            position[1],
            position[2]
        );
        Ok(position)
    }

    /// Discards the trajectory and starts a fresh estimation session.
    ///
    /// This is the caller's recovery action after
    /// [`EstimationError::SingularCovariance`]; the next tick starts from
    /// the zero state with the configured initial uncertainty, and the tick
    /// clock restarts as on the first invocation.
    ///
    /// [`EstimationError::SingularCovariance`]: ../error/enum.EstimationError.html#variant.SingularCovariance
    pub fn reset(&mut self) {
        self.state = KalmanState::new_zero(self.config.initial_covariance_scale);
        self.last_tick = None;
        debug!("estimator reset");
    }

    /// The current filter state.
    pub fn state(&self) -> &KalmanState {
        &self.state
    }

    /// The tuning this reckoner was built with.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }
}

fn validate(sample: &Telemetry, dt: f64) -> EstimationResult<()> {
    if !sample.altitude.is_finite() {
        return Err(EstimationError::NonFiniteInput("altitude"));
    }
    if !sample.attitude.roll.is_finite() {
        return Err(EstimationError::NonFiniteInput("roll"));
    }
    if !sample.attitude.pitch.is_finite() {
        return Err(EstimationError::NonFiniteInput("pitch"));
    }
    if !sample.attitude.yaw.is_finite() {
        return Err(EstimationError::NonFiniteInput("yaw"));
    }
    if !(sample.velocity[0].is_finite()
        && sample.velocity[1].is_finite()
        && sample.velocity[2].is_finite())
    {
        return Err(EstimationError::NonFiniteInput("velocity"));
    }
    if !dt.is_finite() {
        return Err(EstimationError::NonFiniteInput("elapsed time"));
    }
    Ok(())
}
