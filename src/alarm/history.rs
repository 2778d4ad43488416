//! Timestamped record of alarm status transitions.

use super::{AlarmStatus, StatusObserver};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub at: DateTime<Utc>,
    pub status: AlarmStatus,
}

/// Observer that keeps every alarm status change it has seen.
///
/// Register it with [`AlarmController::add_status_listener`](super::AlarmController::add_status_listener)
/// and read it back at any time; it is safe to share between the
/// controller and other threads.
#[derive(Default)]
pub struct StatusHistory {
    changes: Mutex<Vec<StatusChange>>,
    detections: Mutex<u64>,
}

impl StatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<StatusChange> {
        self.changes.lock().clone()
    }

    pub fn latest(&self) -> Option<AlarmStatus> {
        self.changes.lock().last().map(|c| c.status)
    }

    /// Number of classified frames that contained a threat.
    pub fn threat_detections(&self) -> u64 {
        *self.detections.lock()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.changes.lock())
    }
}

impl StatusObserver for StatusHistory {
    fn on_alarm_status_changed(&self, status: AlarmStatus) {
        self.changes.lock().push(StatusChange {
            at: Utc::now(),
            status,
        });
    }

    fn on_threat_detection(&self, detected: bool) {
        if detected {
            *self.detections.lock() += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_changes_in_order() {
        let history = StatusHistory::new();
        assert_eq!(history.latest(), None);

        history.on_alarm_status_changed(AlarmStatus::PendingAlarm);
        history.on_alarm_status_changed(AlarmStatus::Alarm);

        let statuses: Vec<_> = history.changes().iter().map(|c| c.status).collect();
        assert_eq!(statuses, vec![AlarmStatus::PendingAlarm, AlarmStatus::Alarm]);
        assert_eq!(history.latest(), Some(AlarmStatus::Alarm));

        let changes = history.changes();
        assert!(changes[0].at <= changes[1].at);
    }

    #[test]
    fn test_counts_positive_detections_only() {
        let history = StatusHistory::new();
        history.on_threat_detection(true);
        history.on_threat_detection(false);
        history.on_threat_detection(true);
        assert_eq!(history.threat_detections(), 2);
    }

    #[test]
    fn test_to_json() {
        let history = StatusHistory::new();
        history.on_alarm_status_changed(AlarmStatus::NoAlarm);
        let json = history.to_json().unwrap();
        let parsed: Vec<StatusChange> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].status, AlarmStatus::NoAlarm);
    }
}
