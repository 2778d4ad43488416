//! Sensors tracked by the alarm controller.
//!
//! A sensor is a binary input (door contact, window contact, motion
//! detector) identified by its name. The controller never polls hardware;
//! activation changes arrive through
//! [`AlarmController::change_sensor_activation`](crate::alarm::AlarmController::change_sensor_activation).

pub mod sensor;

pub use sensor::{Sensor, SensorType};
