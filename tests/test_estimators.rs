//! Test the numerical operations of the covariance estimator.
//!
//! Prediction and correction are driven through repeated cycles and the
//! expected state, covariance behavior and failure modes are checked
//! against independently computed reference values.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{DVector, Vector3, Vector6};

use flight_estimate::error::EstimationError;
use flight_estimate::models::{
    DisplacementCoupling, KalmanState, LinearObserveModel, LinearPredictModel,
};

const PROCESS_NOISE: f64 = 1e-4;
const MEASUREMENT_NOISE: f64 = 1e-1;
const INITIAL_COVARIANCE: f64 = 1e-2;

fn models(coupling: DisplacementCoupling) -> (LinearPredictModel, LinearObserveModel) {
    (
        LinearPredictModel::constant_velocity(PROCESS_NOISE),
        LinearObserveModel::altitude_displacement(MEASUREMENT_NOISE, coupling),
    )
}

fn hover_measurement(altitude: f64) -> DVector<f64> {
    DVector::from_column_slice(&[altitude, 0.0, 0.0, 0.0])
}

#[test]
fn wrong_measurement_dimension_is_rejected() {
    let (pred, obs) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    state.predict(&pred);
    let before = state.clone();

    for &len in [3usize, 5].iter() {
        let err = state.correct(&obs, &DVector::zeros(len)).unwrap_err();
        assert_eq!(
            err,
            EstimationError::DimensionMismatch {
                expected: 4,
                actual: len
            }
        );
        assert_eq!(state, before);
    }
}

#[test]
fn non_finite_measurement_is_rejected() {
    let (pred, obs) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    state.predict(&pred);
    let before = state.clone();

    let z = DVector::from_column_slice(&[1.0, f64::NAN, 0.0, 0.0]);
    assert_eq!(
        state.correct(&obs, &z).unwrap_err(),
        EstimationError::NonFiniteInput("measurement")
    );
    assert_eq!(state, before);
}

#[test]
fn predict_carries_velocity_and_grows_uncertainty() {
    // the transition only propagates position from velocity, never the
    // reverse, and without corrections the covariance trace only grows
    let (pred, _) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    state.x = Vector6::new(0.0, 0.0, 0.0, 1.0, 2.0, 3.0);

    let mut last_trace = state.X.trace();
    for k in 1..=5 {
        state.predict(&pred);

        assert_eq!(state.velocity(), Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(state.x[0], k as f64 * 1.0);
        assert_relative_eq!(state.x[1], k as f64 * 2.0);
        assert_relative_eq!(state.x[2], k as f64 * 3.0);

        let trace = state.X.trace();
        assert!(trace > last_trace);
        last_trace = trace;
    }
}

#[test]
fn predict_returns_the_a_priori_state() {
    let (pred, obs) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);

    let prior = state.predict(&pred);
    assert_eq!(prior, state);

    let posterior = state.correct(&obs, &hover_measurement(1.0)).unwrap();
    assert_eq!(posterior, state);
    assert!(posterior.x[2] > prior.x[2]);
}

#[test]
fn steady_measurements_converge_to_the_observed_altitude() {
    // constant altitude 1.0 and zero displacement: z converges to 1.0
    // (overshooting first, permanently within 1% from tick 31), x and y
    // never move, and the observed block of the covariance settles
    // monotonically once the initial transient has passed
    let (pred, obs) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    let z = hover_measurement(1.0);

    let mut observed_trace = None;
    for tick in 1..=120 {
        state.predict(&pred);
        state.correct(&obs, &z).unwrap();

        assert_eq!(state.x[0], 0.0);
        assert_eq!(state.x[1], 0.0);

        let sub: f64 = (2..6).map(|i| state.X[(i, i)]).sum();
        if tick >= 3 {
            if let Some(last) = observed_trace {
                assert!(sub <= last + 1e-12, "tick {}: {} > {}", tick, sub, last);
            }
            observed_trace = Some(sub);
        }
        if tick >= 31 {
            assert!(
                (state.x[2] - 1.0).abs() <= 0.01,
                "tick {}: z = {}",
                tick,
                state.x[2]
            );
        }
    }
    assert_relative_eq!(state.x[2], 1.0, epsilon = 1e-4);
}

#[test]
fn unobserved_horizontal_uncertainty_grows() {
    // nothing in the measurement informs x or y, so their variance inflates
    // by the process noise every cycle even while corrections run
    let (pred, obs) = models(DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    let z = hover_measurement(1.0);

    let mut last = state.X[(0, 0)] + state.X[(1, 1)];
    for _ in 0..40 {
        state.predict(&pred);
        state.correct(&obs, &z).unwrap();

        let horizontal = state.X[(0, 0)] + state.X[(1, 1)];
        assert!(horizontal > last);
        last = horizontal;
    }
}

#[test]
fn position_coupling_splits_conflicting_altitude_observations() {
    // with the displacement rows routed to position, the dz row becomes a
    // second observation of state z; a zero displacement under a constant
    // 1m altitude settles exactly between the two readings
    let (pred, obs) = models(DisplacementCoupling::Position);
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);
    let z = hover_measurement(1.0);

    for _ in 0..300 {
        state.predict(&pred);
        state.correct(&obs, &z).unwrap();
    }
    assert_abs_diff_eq!(state.x[2], 0.5, epsilon = 1e-5);
    assert_eq!(state.x[0], 0.0);
    assert_eq!(state.x[1], 0.0);
}

#[test]
fn degenerate_noise_configuration_is_singular() {
    // all-zero noise and covariance leave nothing to invert
    let pred = LinearPredictModel::constant_velocity(0.0);
    let obs = LinearObserveModel::altitude_displacement(0.0, DisplacementCoupling::Velocity);
    let mut state = KalmanState::new_zero(0.0);
    state.predict(&pred);

    assert_eq!(
        state.correct(&obs, &hover_measurement(0.0)).unwrap_err(),
        EstimationError::SingularCovariance
    );
}

#[test]
fn init_validates_the_covariance() {
    let mut state = KalmanState::new_zero(INITIAL_COVARIANCE);

    let mut good = KalmanState::new_zero(0.5);
    good.x[2] = 2.0;
    let rcond = state.init(&good).unwrap();
    assert_relative_eq!(rcond, 1.0);
    assert_eq!(state, good);

    let mut negative = KalmanState::new_zero(INITIAL_COVARIANCE);
    negative.X[(3, 3)] = -1.0;
    assert_eq!(
        state.init(&negative).unwrap_err(),
        EstimationError::SingularCovariance
    );
    assert_eq!(state, good);

    let mut poisoned = KalmanState::new_zero(INITIAL_COVARIANCE);
    poisoned.X[(0, 0)] = f64::NAN;
    assert_eq!(
        state.init(&poisoned).unwrap_err(),
        EstimationError::SingularCovariance
    );
    assert_eq!(state, good);
}
