//! Alarm state machine.
//!
//! Combines three independent inputs into the current [`AlarmStatus`]:
//! sensor activation changes, arming changes and camera frame
//! classifications. The rules, in short:
//!
//! - Disarming always clears the alarm.
//! - Arming resets every sensor to inactive; arming at home while the last
//!   frame showed a threat raises the alarm at once.
//! - While armed, a sensor activation escalates `NoAlarm -> PendingAlarm -> Alarm`.
//! - While pending, the alarm clears once no sensor is active any more.
//! - Once in `Alarm`, sensor changes no longer affect the status.
//! - A threat in a frame while armed at home raises the alarm directly; a
//!   clear frame clears the alarm if no sensor is active.
//!
//! The controller is single-threaded: every call runs to completion,
//! including observer callbacks, before returning. Share it across threads
//! through [`SharedController`].

use super::{AlarmStatus, ArmingStatus, StatusNotifier, StatusObserver};
use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::detector::{Frame, ThreatDetector};
use crate::error::{Result, SecurityError};
use crate::sensors::Sensor;
use crate::store::StateStore;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

/// A controller behind the single lock that serialises all transitions.
pub type SharedController<S, D> = Arc<Mutex<AlarmController<S, D>>>;

pub struct AlarmController<S, D> {
    store: S,
    detector: D,
    confidence_threshold: f32,
    notifier: StatusNotifier,
    /// Result of the most recent successful classification.
    threat_detected: bool,
}

impl<S: StateStore, D: ThreatDetector> AlarmController<S, D> {
    /// Create a controller over `store`, starting from whatever state it holds.
    ///
    /// `confidence_threshold` is a percentage and must lie in `0.0..=100.0`.
    pub fn new(store: S, detector: D, confidence_threshold: f32) -> Result<Self> {
        if !(0.0..=100.0).contains(&confidence_threshold) {
            return Err(SecurityError::InvalidArgument(format!(
                "confidence threshold {confidence_threshold} outside 0..=100"
            )));
        }
        Ok(Self {
            store,
            detector,
            confidence_threshold,
            notifier: StatusNotifier::new(),
            threat_detected: false,
        })
    }

    /// Create a controller using [`DEFAULT_CONFIDENCE_THRESHOLD`].
    pub fn with_default_threshold(store: S, detector: D) -> Self {
        Self {
            store,
            detector,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            notifier: StatusNotifier::new(),
            threat_detected: false,
        }
    }

    pub fn into_shared(self) -> SharedController<S, D> {
        Arc::new(Mutex::new(self))
    }

    pub fn arming_status(&self) -> ArmingStatus {
        self.store.arming_status()
    }

    pub fn alarm_status(&self) -> AlarmStatus {
        self.store.alarm_status()
    }

    pub fn sensors(&self) -> Vec<Sensor> {
        self.store.sensors()
    }

    pub fn last_threat_detected(&self) -> bool {
        self.threat_detected
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn add_status_listener(&mut self, observer: Arc<dyn StatusObserver>) {
        self.notifier.add(observer);
    }

    /// Returns whether the observer was registered.
    pub fn remove_status_listener(&mut self, observer: &Arc<dyn StatusObserver>) -> bool {
        self.notifier.remove(observer)
    }

    /// Register a sensor. Fails with [`SecurityError::DuplicateSensor`] if
    /// a sensor with the same name exists.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        if self.store.sensor(sensor.name()).is_some() {
            return Err(SecurityError::DuplicateSensor(sensor.name().to_string()));
        }
        info!("[Sensor] Added {}", sensor);
        self.store.add_sensor(sensor)?;
        self.notifier.notify_sensors_changed();
        Ok(())
    }

    /// Unregister a sensor. Fails with [`SecurityError::SensorNotFound`] if
    /// no sensor with that name exists.
    pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        if self.store.sensor(sensor.name()).is_none() {
            return Err(SecurityError::SensorNotFound(sensor.name().to_string()));
        }
        self.store.remove_sensor(sensor)?;
        info!("[Sensor] Removed {}", sensor.name());
        self.notifier.notify_sensors_changed();
        Ok(())
    }

    /// Change the arming mode.
    ///
    /// Sensor resets, the arming write and any resulting alarm write are
    /// applied together: if a store write fails, the earlier ones are
    /// restored and observers hear nothing.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        let previous_arming = self.store.arming_status();
        let target = match status {
            ArmingStatus::Disarmed => Some(AlarmStatus::NoAlarm),
            ArmingStatus::ArmedHome if self.threat_detected => Some(AlarmStatus::Alarm),
            _ => None,
        };
        let reset: Vec<Sensor> = if status.is_armed() {
            self.store
                .sensors()
                .into_iter()
                .filter(Sensor::is_active)
                .collect()
        } else {
            Vec::new()
        };

        self.reset_sensors(&reset)?;
        if let Err(e) = self.store.set_arming_status(status) {
            self.restore_sensors(&reset);
            return Err(e);
        }
        let previous_alarm = match target {
            Some(target) => match self.write_alarm_status(target) {
                Ok(previous) => Some(previous),
                Err(e) => {
                    self.restore_arming_status(previous_arming);
                    self.restore_sensors(&reset);
                    return Err(e);
                }
            },
            None => None,
        };

        info!("[Alarm] Arming status set to {}", status.description());
        if !reset.is_empty() {
            debug!("[Sensor] All sensors reset to inactive");
            self.notifier.notify_sensors_changed();
        }
        if let (Some(previous), Some(target)) = (previous_alarm, target) {
            if target == AlarmStatus::Alarm {
                info!("[Alarm] Armed at home while a threat is in view");
            }
            self.announce_alarm_status(previous, target);
        }
        Ok(())
    }

    /// Apply a sensor activation change.
    ///
    /// The stored copy of the sensor is authoritative: reporting the state
    /// it already has is a no-op. If the resulting alarm write fails, the
    /// sensor is restored so a retry sees the change again.
    pub fn change_sensor_activation(&mut self, sensor: &Sensor, active: bool) -> Result<()> {
        let original = self
            .store
            .sensor(sensor.name())
            .ok_or_else(|| SecurityError::SensorNotFound(sensor.name().to_string()))?;

        // Redundant events never escalate, not even a repeated activation while pending
        if original.is_active() == active {
            debug!(
                "[Sensor] {} already {}, ignoring",
                original.name(),
                if active { "active" } else { "inactive" }
            );
            return Ok(());
        }

        let alarm_status = self.store.alarm_status();
        let target = self.sensor_transition(&original, alarm_status, active);

        let mut updated = original.clone();
        updated.set_active(active);
        self.store.update_sensor(&updated)?;

        let previous_alarm = match target {
            Some(target) => match self.write_alarm_status(target) {
                Ok(previous) => Some(previous),
                Err(e) => {
                    self.restore_sensors(std::slice::from_ref(&original));
                    return Err(e);
                }
            },
            None => None,
        };

        info!("[Sensor] {}", updated);
        self.notifier.notify_sensors_changed();
        match (previous_alarm, target) {
            (Some(previous), Some(target)) => self.announce_alarm_status(previous, target),
            _ if alarm_status == AlarmStatus::Alarm => {
                debug!("[Alarm] Already in alarm, sensor change has no effect")
            }
            _ => {}
        }
        Ok(())
    }

    /// Classify a camera frame and react to the result.
    ///
    /// A detector failure is returned unchanged and leaves both the alarm
    /// status and the cached classification untouched.
    pub fn process_image(&mut self, frame: &Frame) -> Result<()> {
        let detected = self.detector.classify(frame, self.confidence_threshold)?;
        self.threat_detected = detected;
        debug!("[Camera] Threat detected: {}", detected);
        self.notifier.notify_threat_detection(detected);

        if detected {
            if self.store.arming_status() == ArmingStatus::ArmedHome {
                info!("[Camera] Threat detected while armed at home");
                return self.set_alarm_status(AlarmStatus::Alarm);
            }
            Ok(())
        } else if !self.any_sensor_active() {
            self.set_alarm_status(AlarmStatus::NoAlarm)
        } else {
            Ok(())
        }
    }

    /// Alarm status a sensor change leads to, worked out before anything is written.
    fn sensor_transition(
        &self,
        sensor: &Sensor,
        alarm_status: AlarmStatus,
        active: bool,
    ) -> Option<AlarmStatus> {
        match alarm_status {
            AlarmStatus::Alarm => None,
            _ if active => {
                if !self.store.arming_status().is_armed() {
                    return None;
                }
                match alarm_status {
                    AlarmStatus::NoAlarm => Some(AlarmStatus::PendingAlarm),
                    _ => Some(AlarmStatus::Alarm),
                }
            }
            AlarmStatus::PendingAlarm => {
                let others_active = self
                    .store
                    .sensors()
                    .iter()
                    .any(|s| s.is_active() && s != sensor);
                (!others_active).then_some(AlarmStatus::NoAlarm)
            }
            AlarmStatus::NoAlarm => None,
        }
    }

    /// Bulk-deactivate `sensors` without running the activation rules.
    ///
    /// On failure the sensors already reset are restored.
    fn reset_sensors(&mut self, sensors: &[Sensor]) -> Result<()> {
        for (done, sensor) in sensors.iter().enumerate() {
            let mut cleared = sensor.clone();
            cleared.set_active(false);
            if let Err(e) = self.store.update_sensor(&cleared) {
                self.restore_sensors(&sensors[..done]);
                return Err(e);
            }
        }
        Ok(())
    }

    fn restore_sensors(&mut self, originals: &[Sensor]) {
        for sensor in originals {
            if let Err(e) = self.store.update_sensor(sensor) {
                warn!("[Sensor] Could not restore {}: {}", sensor.name(), e);
            }
        }
    }

    fn restore_arming_status(&mut self, status: ArmingStatus) {
        if let Err(e) = self.store.set_arming_status(status) {
            warn!("[Alarm] Could not restore arming status {}: {}", status, e);
        }
    }

    fn any_sensor_active(&self) -> bool {
        self.store.sensors().iter().any(Sensor::is_active)
    }

    /// Write the alarm status and notify observers if it changed.
    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        let previous = self.write_alarm_status(status)?;
        self.announce_alarm_status(previous, status);
        Ok(())
    }

    /// Store the alarm status, returning the value it replaced.
    fn write_alarm_status(&mut self, status: AlarmStatus) -> Result<AlarmStatus> {
        let previous = self.store.alarm_status();
        self.store.set_alarm_status(status)?;
        Ok(previous)
    }

    fn announce_alarm_status(&self, previous: AlarmStatus, status: AlarmStatus) {
        if previous == status {
            debug!("[Alarm] Status remains {}", status);
            return;
        }
        info!(
            "[Alarm] {} -> {} ({})",
            previous,
            status,
            status.description()
        );
        self.notifier.notify_status(status);
    }
}
