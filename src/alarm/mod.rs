//! Arming and alarm status, and the controller that moves between them.
//!
//! [`ArmingStatus`] is chosen by the operator. [`AlarmStatus`] is derived:
//! only [`AlarmController`] writes it, in response to sensor changes,
//! arming changes and camera frames. Every change is pushed to the
//! registered [`StatusObserver`]s.

pub mod controller;
pub mod history;
pub mod notifier;

pub use controller::{AlarmController, SharedController};
pub use history::{StatusChange, StatusHistory};
pub use notifier::{StatusNotifier, StatusObserver};

use crate::error::{Result, SecurityError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, FromRepr, IntoEnumIterator};

/// Whether the system is guarding the premises, and in which profile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    FromRepr,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArmingStatus {
    Disarmed = 0,
    ArmedHome = 1,
    ArmedAway = 2,
}

impl ArmingStatus {
    pub fn is_armed(self) -> bool {
        self != ArmingStatus::Disarmed
    }

    /// Operator-facing label.
    pub fn description(self) -> &'static str {
        match self {
            ArmingStatus::Disarmed => "Disarmed",
            ArmingStatus::ArmedHome => "Armed - At Home",
            ArmingStatus::ArmedAway => "Armed - Away",
        }
    }
}

impl FromStr for ArmingStatus {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace(['-', ' '], "_");
        ArmingStatus::iter()
            .find(|status| status.as_ref().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| SecurityError::InvalidArgument(format!("unknown arming status '{s}'")))
    }
}

impl TryFrom<u8> for ArmingStatus {
    type Error = SecurityError;

    fn try_from(value: u8) -> Result<Self> {
        ArmingStatus::from_repr(value).ok_or_else(|| {
            SecurityError::InvalidArgument(format!("arming status code {value} is not defined"))
        })
    }
}

/// Severity of the current alert condition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    FromRepr,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmStatus {
    NoAlarm = 0,
    PendingAlarm = 1,
    Alarm = 2,
}

impl AlarmStatus {
    /// Operator-facing label.
    pub fn description(self) -> &'static str {
        match self {
            AlarmStatus::NoAlarm => "Cool and Good",
            AlarmStatus::PendingAlarm => "I'm in Danger...",
            AlarmStatus::Alarm => "Awooga!",
        }
    }
}

impl FromStr for AlarmStatus {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace(['-', ' '], "_");
        AlarmStatus::iter()
            .find(|status| status.as_ref().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| SecurityError::InvalidArgument(format!("unknown alarm status '{s}'")))
    }
}

impl TryFrom<u8> for AlarmStatus {
    type Error = SecurityError;

    fn try_from(value: u8) -> Result<Self> {
        AlarmStatus::from_repr(value).ok_or_else(|| {
            SecurityError::InvalidArgument(format!("alarm status code {value} is not defined"))
        })
    }
}
