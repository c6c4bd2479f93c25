#![allow(non_snake_case)]

//! Estimation models.
//!
//! The state representation is modeled as a struct. The linear prediction
//! and observation models are structs pairing the model matrix with its
//! additive noise covariance.

use nalgebra::{Matrix4, Matrix4x6, Matrix6, Vector3, Vector6};

/// Kalman state.
///
/// Linear representation as a state vector and the state covariance
/// (symmetric positive semi-definite) matrix.
///
/// The layout of the state vector is fixed: world-frame position
/// (x, y, z) in meters followed by world-frame velocity (vx, vy, vz) in
/// meters per second. Velocity is carried forward by prediction and is not
/// directly measured.
#[derive(PartialEq, Clone, Debug)]
pub struct KalmanState {
    /// State vector
    pub x: Vector6<f64>,
    /// State covariance matrix (symmetric positive semi-definite)
    pub X: Matrix6<f64>,
}

impl KalmanState {
    /// Zero state with an identity-scaled covariance.
    pub fn new_zero(covariance_scale: f64) -> KalmanState {
        KalmanState {
            x: Vector6::zeros(),
            X: Matrix6::from_diagonal_element(covariance_scale),
        }
    }

    /// World-frame position estimate (x, y, z).
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x[0], self.x[1], self.x[2])
    }

    /// World-frame velocity estimate (vx, vy, vz).
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.x[3], self.x[4], self.x[5])
    }
}

/// State components informed by the displacement rows of the measurement.
///
/// [`Velocity`] corrects the velocity components with the integrated
/// displacement and is the default wiring. [`Position`] routes the same
/// rows to the position components instead, treating the displacement as a
/// direct position observation. The variants behave very differently under
/// a constant-altitude hover; see DESIGN.md for the recorded trade-off.
///
/// [`Velocity`]: #variant.Velocity
/// [`Position`]: #variant.Position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplacementCoupling {
    /// The displacement rows inform vx, vy, vz.
    Velocity,
    /// The displacement rows inform x, y, z.
    Position,
}

/// Linear prediction model.
///
/// Prediction is represented by a state transition matrix with additive
/// process noise.
pub struct LinearPredictModel {
    /// State transition matrix
    pub Fx: Matrix6<f64>,
    /// Process noise covariance
    pub Q: Matrix6<f64>,
}

impl LinearPredictModel {
    /// Constant-velocity transition: position advances by velocity under a
    /// unit step, velocity carries forward unchanged.
    ///
    /// Elapsed time is pre-scaled into the measurement displacement rather
    /// than into the transition, so the matrix is constant for the lifetime
    /// of the filter.
    pub fn constant_velocity(process_noise_scale: f64) -> LinearPredictModel {
        let mut Fx = Matrix6::identity();
        Fx[(0, 3)] = 1.0;
        Fx[(1, 4)] = 1.0;
        Fx[(2, 5)] = 1.0;
        LinearPredictModel {
            Fx,
            Q: Matrix6::from_diagonal_element(process_noise_scale),
        }
    }
}

/// Linear observation model.
///
/// Observation is represented by an observation matrix with additive
/// measurement noise. The measurement is (altitude, dx, dy, dz): an
/// absolute altitude and the world-frame displacement accumulated since the
/// previous tick.
pub struct LinearObserveModel {
    /// Observation matrix
    pub Hx: Matrix4x6<f64>,
    /// Measurement noise covariance
    pub Z: Matrix4<f64>,
}

impl LinearObserveModel {
    /// Altitude plus displacement observation.
    ///
    /// The altitude row always informs state z; the three displacement rows
    /// inform the components selected by `coupling`.
    pub fn altitude_displacement(
        measurement_noise_scale: f64,
        coupling: DisplacementCoupling,
    ) -> LinearObserveModel {
        let mut Hx = Matrix4x6::zeros();
        Hx[(0, 2)] = 1.0;
        let first = match coupling {
            DisplacementCoupling::Velocity => 3,
            DisplacementCoupling::Position => 0,
        };
        for i in 0..3 {
            Hx[(1 + i, first + i)] = 1.0;
        }
        LinearObserveModel {
            Hx,
            Z: Matrix4::from_diagonal_element(measurement_noise_scale),
        }
    }
}
