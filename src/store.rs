//! Durable state the alarm controller reads from and writes to.
//!
//! The controller owns the transition rules; a [`StateStore`] only holds
//! values. Backends may persist anywhere, the controller only relies on
//! read-your-writes within a single call sequence.

use crate::alarm::{AlarmStatus, ArmingStatus};
use crate::error::{Result, SecurityError};
use crate::sensors::Sensor;
use std::collections::BTreeMap;

/// Storage for arming status, alarm status and the sensor set.
pub trait StateStore {
    fn arming_status(&self) -> ArmingStatus;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()>;

    fn alarm_status(&self) -> AlarmStatus;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()>;

    /// Snapshot of the sensor set, ordered by name.
    fn sensors(&self) -> Vec<Sensor>;

    /// Look up a sensor by identity.
    fn sensor(&self, name: &str) -> Option<Sensor> {
        self.sensors().into_iter().find(|s| s.name() == name)
    }

    /// Fails with [`SecurityError::DuplicateSensor`] if the name is taken.
    fn add_sensor(&mut self, sensor: Sensor) -> Result<()>;

    /// Fails with [`SecurityError::SensorNotFound`] if the name is unknown.
    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()>;

    /// Replace the stored copy of `sensor`.
    ///
    /// Fails with [`SecurityError::SensorNotFound`] if the name is unknown.
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<()>;
}

/// In-process [`StateStore`] backed by a sorted map.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
    sensors: BTreeMap<String, Sensor>,
}

impl InMemoryStore {
    /// Disarmed, no alarm, no sensors.
    pub fn new() -> Self {
        Self::with_state(ArmingStatus::Disarmed, AlarmStatus::NoAlarm)
    }

    pub fn with_state(arming_status: ArmingStatus, alarm_status: AlarmStatus) -> Self {
        Self {
            arming_status,
            alarm_status,
            sensors: BTreeMap::new(),
        }
    }

    /// Builder-style sensor registration; later duplicates replace earlier ones.
    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.insert(sensor.name().to_string(), sensor);
        self
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStore {
    fn arming_status(&self) -> ArmingStatus {
        self.arming_status
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        self.arming_status = status;
        Ok(())
    }

    fn alarm_status(&self) -> AlarmStatus {
        self.alarm_status
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        self.alarm_status = status;
        Ok(())
    }

    fn sensors(&self) -> Vec<Sensor> {
        self.sensors.values().cloned().collect()
    }

    fn sensor(&self, name: &str) -> Option<Sensor> {
        self.sensors.get(name).cloned()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        if self.sensors.contains_key(sensor.name()) {
            return Err(SecurityError::DuplicateSensor(sensor.name().to_string()));
        }
        self.sensors.insert(sensor.name().to_string(), sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.sensors
            .remove(sensor.name())
            .map(|_| ())
            .ok_or_else(|| SecurityError::SensorNotFound(sensor.name().to_string()))
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        match self.sensors.get_mut(sensor.name()) {
            Some(stored) => {
                *stored = sensor.clone();
                Ok(())
            }
            None => Err(SecurityError::SensorNotFound(sensor.name().to_string())),
        }
    }
}
