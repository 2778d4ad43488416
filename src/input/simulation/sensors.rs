//! Simulated sensor events.

use super::task_rng;
use crate::alarm::SharedController;
use crate::detector::ThreatDetector;
use crate::store::StateStore;
use log::{info, warn};
use rand::seq::SliceRandom;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

/// Spawn a task that toggles one randomly chosen sensor every `period`.
///
/// # Returns
///
/// A `JoinHandle` that can be used to abort the simulation task.
pub fn run_sensor_simulation<S, D>(
    controller: SharedController<S, D>,
    period: Duration,
    seed: Option<u64>,
) -> JoinHandle<()>
where
    S: StateStore + Send + 'static,
    D: ThreatDetector + Send + 'static,
{
    tokio::spawn(async move {
        let mut rng = task_rng(seed, 1);
        let mut interval = interval(period);
        loop {
            interval.tick().await;
            let mut controller = controller.lock();
            let sensors = controller.sensors();
            let Some(sensor) = sensors.choose(&mut rng) else {
                continue;
            };
            let active = !sensor.is_active();
            info!(
                "[Sim] {} {}",
                sensor.name(),
                if active { "triggered" } else { "cleared" }
            );
            if let Err(e) = controller.change_sensor_activation(sensor, active) {
                warn!("[Sim] Sensor event for {} failed: {}", sensor.name(), e);
            }
        }
    })
}
