#![allow(non_snake_case)]

//! Covariance state estimation.
//!
//! The estimation operations are implemented directly on the Kalman state
//! representation [`KalmanState`]: the x,X pair whose dimensions are the
//! dimensions of the system. Prediction propagates the state through the
//! linear transition model and inflates the covariance; correction folds a
//! measurement in through the optimal gain and deflates it.
//!
//! [`KalmanState`]: ../../models/struct.KalmanState.html

use nalgebra::{DVector, Vector4};

use crate::error::{EstimationError, EstimationResult};
use crate::linalg::rcond;
use crate::models::{KalmanState, LinearObserveModel, LinearPredictModel};

/// Number of rows a measurement vector must have.
pub const MEASUREMENT_DIM: usize = 4;

impl KalmanState {
    /// Adopts `state` after validating that its covariance is positive
    /// semi-definite.
    ///
    /// Returns the reciprocal condition number of the adopted covariance.
    /// On rejection the current state is untouched.
    pub fn init(&mut self, state: &KalmanState) -> EstimationResult<f64> {
        let rc = rcond::check_non_negative(rcond::rcond_symmetric(&state.X))?;
        self.x = state.x;
        self.X = state.X;

        Ok(rc)
    }

    /// State prediction with the linear model and additive noise.
    ///
    /// x = Fx.x, X = Fx.X.Fx' + Q. Returns the a priori state, which
    /// callers may display as the pre-correction estimate.
    pub fn predict(&mut self, pred: &LinearPredictModel) -> KalmanState {
        self.x = pred.Fx * self.x;
        // X = Fx.X.Fx' + Q
        self.X.quadform_tr(1.0, &pred.Fx, &self.X.clone(), 0.0);
        self.X += pred.Q;

        self.clone()
    }

    /// Correction by a measurement z = (altitude, dx, dy, dz).
    ///
    /// Computes the innovation s = z - Hx.x and its covariance
    /// S = Hx.X.Hx' + Z, the gain W = X.Hx'.S⁻¹, then applies x += W.s and
    /// X -= W.S.W'. Returns the a posteriori state, the authoritative
    /// position/velocity output for the tick.
    ///
    /// The intended protocol is one [`predict`] per correction.
    /// Back-to-back corrections are numerically valid but outside that
    /// protocol and are not rejected here.
    ///
    /// Fails with [`DimensionMismatch`] unless `z` has exactly
    /// [`MEASUREMENT_DIM`] rows, with [`NonFiniteInput`] if `z` carries a
    /// NaN or infinity, and with [`SingularCovariance`] if the innovation
    /// covariance cannot be factorised. The state is untouched on every
    /// error path.
    ///
    /// [`predict`]: #method.predict
    /// [`DimensionMismatch`]: ../../error/enum.EstimationError.html#variant.DimensionMismatch
    /// [`NonFiniteInput`]: ../../error/enum.EstimationError.html#variant.NonFiniteInput
    /// [`SingularCovariance`]: ../../error/enum.EstimationError.html#variant.SingularCovariance
    /// [`MEASUREMENT_DIM`]: constant.MEASUREMENT_DIM.html
    pub fn correct(
        &mut self,
        obs: &LinearObserveModel,
        z: &DVector<f64>,
    ) -> EstimationResult<KalmanState> {
        if z.len() != MEASUREMENT_DIM {
            return Err(EstimationError::DimensionMismatch {
                expected: MEASUREMENT_DIM,
                actual: z.len(),
            });
        }
        if z.iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::NonFiniteInput("measurement"));
        }
        let z = Vector4::new(z[0], z[1], z[2], z[3]);

        // Innovation
        let s = z - obs.Hx * self.x;

        let XHt = self.X * obs.Hx.transpose();
        // S = Hx.X.Hx' + Z
        let S = obs.Hx * XHt + obs.Z;

        // Inverse innovation covariance
        let SI = S
            .cholesky()
            .ok_or(EstimationError::SingularCovariance)?
            .inverse();
        // Kalman gain, X.Hx'.SI
        let W = XHt * SI;

        // State update
        self.x += W * s;
        // X -= W.S.W'
        self.X.quadform_tr(-1.0, &W, &S, 1.0);
        // rebalance symmetry lost to roundoff
        self.X = (self.X + self.X.transpose()) * 0.5;

        Ok(self.clone())
    }
}
