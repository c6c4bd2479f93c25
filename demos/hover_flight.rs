//! A simulated flight fed through the fusion cycle.
//!
//! Stands in for the vehicle link: noisy altitude and velocity samples are
//! drawn around a scripted climb-and-hover, and the estimated trajectory is
//! printed once per tick.

use std::time::{Duration, Instant};

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use flight_estimate::frame::Attitude;
use flight_estimate::fusion::{DeadReckoner, FusionConfig, Telemetry};

const TICK: Duration = Duration::from_millis(300);
const CLIMB_TICKS: u32 = 10;
const CLIMB_RATE: f64 = 0.4; // m/s

fn main() {
    let mut rng = StdRng::seed_from_u64(7);
    let altitude_noise = Normal::new(0.0, 0.05).unwrap();
    let velocity_noise = Normal::new(0.0, 0.02).unwrap();

    let mut reckoner = DeadReckoner::new(FusionConfig::default());
    let mut now = Instant::now();

    for tick in 0..40 {
        let climbing = tick < CLIMB_TICKS;
        let true_altitude = if climbing {
            CLIMB_RATE * TICK.as_secs_f64() * tick as f64
        } else {
            CLIMB_RATE * TICK.as_secs_f64() * CLIMB_TICKS as f64
        };
        let sample = Telemetry {
            altitude: true_altitude + altitude_noise.sample(&mut rng),
            attitude: Attitude::default(),
            velocity: Vector3::new(
                velocity_noise.sample(&mut rng),
                velocity_noise.sample(&mut rng),
                if climbing { CLIMB_RATE } else { 0.0 } + velocity_noise.sample(&mut rng),
            ),
        };

        match reckoner.step(&sample, now) {
            Ok(position) => println!(
                "x = {:5.2}m, y = {:5.2}m, z = {:5.2}m",
                position[0], position[1], position[2]
            ),
            Err(err) => {
                eprintln!("estimation failed: {}", err);
                reckoner.reset();
            }
        }
        now += TICK;
    }
}
