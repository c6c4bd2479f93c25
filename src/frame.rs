//! Body-frame to world-frame conversion.
//!
//! The vehicle reports velocity in its own body frame; the filter state
//! lives in the fixed world frame. The transform composes the three axis
//! rotations in the order yaw, pitch, roll and integrates over the elapsed
//! time, yielding the displacement accumulated since the previous tick.

use nalgebra::{Rotation3, Vector3};

/// Vehicle orientation as roll, pitch, yaw in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attitude {
    /// Rotation about the longitudinal axis
    pub roll: f64,
    /// Rotation about the lateral axis
    pub pitch: f64,
    /// Rotation about the vertical axis
    pub yaw: f64,
}

impl Attitude {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Attitude {
        Attitude { roll, pitch, yaw }
    }

    /// Rotation taking body-frame vectors into the world frame.
    ///
    /// Composed as yaw · pitch · roll: `from_euler_angles` applies the
    /// primitive rotations in the order roll, pitch, yaw, i.e. Rz·Ry·Rx.
    pub fn to_world(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.roll, self.pitch, self.yaw)
    }
}

/// Displacement accumulated over `dt` seconds, in world coordinates.
///
/// A pure function of its inputs: the composed rotation applied to the
/// body-frame velocity, scaled by the elapsed time. `dt` = 0 yields the
/// zero vector; a negative `dt` (clock irregularity) is clamped to zero so
/// it cannot flip the sign of the correction. Non-finite inputs are the
/// caller's responsibility to reject.
pub fn world_displacement(velocity: Vector3<f64>, attitude: &Attitude, dt: f64) -> Vector3<f64> {
    attitude.to_world() * velocity * dt.max(0.0)
}
