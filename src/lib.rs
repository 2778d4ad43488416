//! Premises alarm controller.
//!
//! Decides the alarm status from three independent inputs: sensor
//! activation events, arming changes and camera frame classifications.
//! Storage and image classification are pluggable through the
//! [`store::StateStore`] and [`detector::ThreatDetector`] traits; status
//! changes are pushed to registered [`alarm::StatusObserver`]s.

pub mod alarm;
pub mod config;
pub mod detector;
pub mod error;
pub mod input;
pub mod sensors;
pub mod store;
