//! Simulated operator arming changes.

use crate::alarm::{ArmingStatus, SharedController};
use crate::detector::ThreatDetector;
use crate::store::StateStore;
use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Mode that follows `current` in the Disarmed -> ArmedHome -> ArmedAway cycle.
pub fn next_arming_status(current: ArmingStatus) -> ArmingStatus {
    match current {
        ArmingStatus::Disarmed => ArmingStatus::ArmedHome,
        ArmingStatus::ArmedHome => ArmingStatus::ArmedAway,
        ArmingStatus::ArmedAway => ArmingStatus::Disarmed,
    }
}

/// Spawn a task that advances the arming mode every `period`.
///
/// The first change happens one full period after start.
pub fn run_arming_simulation<S, D>(
    controller: SharedController<S, D>,
    period: Duration,
) -> JoinHandle<()>
where
    S: StateStore + Send + 'static,
    D: ThreatDetector + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick
        interval.tick().await;
        loop {
            interval.tick().await;
            let mut controller = controller.lock();
            let next = next_arming_status(controller.arming_status());
            info!("[Sim] Operator selects {}", next.description());
            if let Err(e) = controller.set_arming_status(next) {
                warn!("[Sim] Arming change to {} failed: {}", next, e);
            }
        }
    })
}
