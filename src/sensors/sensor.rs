//! Sensor identity and activation state.

use crate::error::{Result, SecurityError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Kind of physical input a sensor represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl FromStr for SensorType {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self> {
        SensorType::iter()
            .find(|t| t.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| SecurityError::InvalidArgument(format!("unknown sensor type '{s}'")))
    }
}

/// A named binary sensor.
///
/// Identity is the name alone: two sensors with the same name are the same
/// sensor regardless of type or activation, so a collection keyed on
/// `Sensor` never holds duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    name: String,
    sensor_type: SensorType,
    active: bool,
}

impl Sensor {
    /// Create an inactive sensor.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Builder-style variant of [`Sensor::set_active`].
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.name,
            self.sensor_type,
            if self.active { "active" } else { "inactive" }
        )
    }
}
