//! Simulated camera frames.

use super::task_rng;
use crate::alarm::SharedController;
use crate::detector::{Frame, ThreatDetector, buffer_len};
use crate::error::Result;
use crate::store::StateStore;
use log::warn;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

const FRAME_WIDTH: u32 = 64;
const FRAME_HEIGHT: u32 = 48;

/// Frame filled with random noise.
pub fn random_frame<R: Rng>(rng: &mut R, width: u32, height: u32) -> Result<Frame> {
    let mut pixels = vec![0u8; buffer_len(width, height)?];
    rng.fill(pixels.as_mut_slice());
    Frame::new(width, height, pixels)
}

/// Spawn a task that feeds a random frame to the controller every `period`.
///
/// Detector failures are logged and the frame is dropped.
pub fn run_camera_simulation<S, D>(
    controller: SharedController<S, D>,
    period: Duration,
    seed: Option<u64>,
) -> JoinHandle<()>
where
    S: StateStore + Send + 'static,
    D: ThreatDetector + Send + 'static,
{
    tokio::spawn(async move {
        let mut rng = task_rng(seed, 2);
        let mut interval = interval(period);
        loop {
            interval.tick().await;
            let frame = match random_frame(&mut rng, FRAME_WIDTH, FRAME_HEIGHT) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("[Sim] Could not build frame: {}", e);
                    continue;
                }
            };
            if let Err(e) = controller.lock().process_image(&frame) {
                warn!("[Camera] Frame dropped: {}", e);
            }
        }
    })
}
