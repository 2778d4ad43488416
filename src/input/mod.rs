//! Input sources that drive the alarm controller.
//!
//! Current input sources:
//! - `simulation`: randomised sensor events, camera frames and arming changes
//!   for development without hardware

pub mod simulation;

pub use simulation::{run_arming_simulation, run_camera_simulation, run_sensor_simulation};
