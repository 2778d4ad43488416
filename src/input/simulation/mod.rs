//! Simulated inputs for development and demos.
//!
//! Each simulation is a tokio task that periodically locks the shared
//! controller, applies one event and releases the lock again. Controller
//! errors are logged and the task carries on with the next tick.

mod arming;
mod camera;
mod sensors;

pub use arming::run_arming_simulation;
pub use camera::{random_frame, run_camera_simulation};
pub use sensors::run_sensor_simulation;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// RNG for one simulation task; each task gets its own stream from the shared seed.
fn task_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}
