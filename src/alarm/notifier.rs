//! Status change notifier.
//!
//! When the alarm status changes, every registered observer is called
//! synchronously, in registration order, before the triggering controller
//! call returns.

use super::AlarmStatus;
use std::sync::Arc;

/// Receives alarm status changes from an [`AlarmController`](super::AlarmController).
///
/// Observers run inline on the controller's call stack and must not call
/// back into the controller.
///
/// Any `Fn(AlarmStatus) + Send + Sync` closure is an observer:
/// ```ignore
/// controller.add_status_listener(Arc::new(|status: AlarmStatus| {
///     log::info!("alarm is now {}", status);
/// }));
/// ```
pub trait StatusObserver: Send + Sync {
    /// Called once per actual alarm status change.
    fn on_alarm_status_changed(&self, status: AlarmStatus);

    /// Called after each successful frame classification.
    fn on_threat_detection(&self, _detected: bool) {}

    /// Called after the sensor set or any sensor's activation changed.
    fn on_sensors_changed(&self) {}
}

impl<F> StatusObserver for F
where
    F: Fn(AlarmStatus) + Send + Sync,
{
    fn on_alarm_status_changed(&self, status: AlarmStatus) {
        self(status)
    }
}

/// Ordered registry of status observers.
#[derive(Default)]
pub struct StatusNotifier {
    observers: Vec<Arc<dyn StatusObserver>>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Registering the same `Arc` twice is a no-op.
    pub fn add(&mut self, observer: Arc<dyn StatusObserver>) {
        if !self.contains(&observer) {
            self.observers.push(observer);
        }
    }

    /// Unregister an observer by identity. Returns whether it was registered.
    pub fn remove(&mut self, observer: &Arc<dyn StatusObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !Arc::ptr_eq(o, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Arc<dyn StatusObserver>) -> bool {
        self.observers.iter().any(|o| Arc::ptr_eq(o, observer))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify_status(&self, status: AlarmStatus) {
        for observer in &self.observers {
            observer.on_alarm_status_changed(status);
        }
    }

    pub fn notify_threat_detection(&self, detected: bool) {
        for observer in &self.observers {
            observer.on_threat_detection(detected);
        }
    }

    pub fn notify_sensors_changed(&self) {
        for observer in &self.observers {
            observer.on_sensors_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        statuses: Mutex<Vec<AlarmStatus>>,
        detections: Mutex<Vec<bool>>,
        sensor_changes: Mutex<usize>,
    }

    impl StatusObserver for Recorder {
        fn on_alarm_status_changed(&self, status: AlarmStatus) {
            self.statuses.lock().push(status);
        }

        fn on_threat_detection(&self, detected: bool) {
            self.detections.lock().push(detected);
        }

        fn on_sensors_changed(&self) {
            *self.sensor_changes.lock() += 1;
        }
    }

    #[test]
    fn test_notify_reaches_all_observers() {
        let mut notifier = StatusNotifier::new();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        notifier.add(a.clone());
        notifier.add(b.clone());

        notifier.notify_status(AlarmStatus::PendingAlarm);
        notifier.notify_threat_detection(true);
        notifier.notify_sensors_changed();

        for recorder in [&a, &b] {
            assert_eq!(*recorder.statuses.lock(), vec![AlarmStatus::PendingAlarm]);
            assert_eq!(*recorder.detections.lock(), vec![true]);
            assert_eq!(*recorder.sensor_changes.lock(), 1);
        }
    }

    #[test]
    fn test_insertion_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = StatusNotifier::new();
        for id in 0..3 {
            let order = order.clone();
            notifier.add(Arc::new(move |_: AlarmStatus| order.lock().push(id)));
        }

        notifier.notify_status(AlarmStatus::Alarm);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let mut notifier = StatusNotifier::new();
        let recorder: Arc<dyn StatusObserver> = Arc::new(Recorder::default());
        notifier.add(recorder.clone());
        notifier.add(recorder.clone());
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_remove_stops_notifications() {
        let mut notifier = StatusNotifier::new();
        let recorder = Arc::new(Recorder::default());
        let handle: Arc<dyn StatusObserver> = recorder.clone();
        notifier.add(handle.clone());

        assert!(notifier.remove(&handle));
        assert!(!notifier.remove(&handle));
        assert!(notifier.is_empty());

        notifier.notify_status(AlarmStatus::Alarm);
        assert!(recorder.statuses.lock().is_empty());
    }
}
