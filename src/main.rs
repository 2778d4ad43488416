use clap::Parser;
use home_security::alarm::{AlarmController, AlarmStatus, ArmingStatus, StatusChange, StatusHistory};
use home_security::config::{Config, load_dotenv};
use home_security::detector::{FakeLabelSource, LabelDetector};
use home_security::error::Result;
use home_security::input::{run_arming_simulation, run_camera_simulation, run_sensor_simulation};
use home_security::sensors::Sensor;
use home_security::store::{InMemoryStore, StateStore};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;

#[derive(Parser)]
#[command(name = "home-security")]
#[command(about = "Alarm controller driven by simulated sensors and camera frames")]
struct Cli {
    /// Detection confidence threshold in percent
    #[arg(long)]
    threshold: Option<f32>,

    /// Seed for reproducible simulation runs
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds between simulated sensor events
    #[arg(long)]
    sensor_interval: Option<u64>,

    /// Seconds between simulated camera frames
    #[arg(long)]
    frame_interval: Option<u64>,

    /// Seconds between simulated arming changes
    #[arg(long)]
    arming_interval: Option<u64>,

    /// Print the final state and status history as JSON on exit
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(threshold) = self.threshold {
            config.detector.confidence_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(secs) = self.sensor_interval {
            config.simulation.sensor_interval_secs = secs;
        }
        if let Some(secs) = self.frame_interval {
            config.simulation.frame_interval_secs = secs;
        }
        if let Some(secs) = self.arming_interval {
            config.simulation.arming_interval_secs = secs;
        }
    }
}

#[derive(Serialize)]
struct Summary {
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
    sensors: Vec<Sensor>,
    threat_detections: u64,
    history: Vec<StatusChange>,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    let loaded = load_dotenv();
    init_logger();
    info!("Starting home security controller");
    if loaded > 0 {
        info!("Loaded {} variable(s) from .env", loaded);
    }

    if let Err(e) = run(Cli::parse()).await {
        log::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    info!("Configuration loaded:");
    info!(
        "  Threat label: '{}' at {:.1}% confidence",
        config.detector.target_label, config.detector.confidence_threshold
    );
    info!("  Sensors: {}", config.simulation.sensors.len());
    info!(
        "  Intervals: sensors {}s, frames {}s, arming {}s",
        config.simulation.sensor_interval_secs,
        config.simulation.frame_interval_secs,
        config.simulation.arming_interval_secs
    );

    let mut store = InMemoryStore::new();
    for spec in &config.simulation.sensors {
        store.add_sensor(Sensor::new(spec.name.clone(), spec.sensor_type))?;
    }

    let detector = LabelDetector::new(
        FakeLabelSource::new(&config.detector.target_label, config.simulation.seed),
        &config.detector.target_label,
    );
    let mut controller =
        AlarmController::new(store, detector, config.detector.confidence_threshold)?;

    let history = Arc::new(StatusHistory::new());
    controller.add_status_listener(history.clone());
    controller.add_status_listener(Arc::new(|status: AlarmStatus| match status {
        AlarmStatus::Alarm => warn!("[Alarm] ALARM RAISED: {}", status.description()),
        _ => info!("[Alarm] Status now {}", status.description()),
    }));

    let controller = controller.into_shared();
    let sim = &config.simulation;
    let tasks = [
        run_sensor_simulation(
            controller.clone(),
            Duration::from_secs(sim.sensor_interval_secs),
            sim.seed,
        ),
        run_camera_simulation(
            controller.clone(),
            Duration::from_secs(sim.frame_interval_secs),
            sim.seed,
        ),
        run_arming_simulation(
            controller.clone(),
            Duration::from_secs(sim.arming_interval_secs),
        ),
    ];

    info!("Home security controller is running");
    info!("  - Press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
    }

    for task in &tasks {
        task.abort();
    }

    let controller = controller.lock();
    info!(
        "Final state: {} / {} after {} status change(s)",
        controller.arming_status().description(),
        controller.alarm_status().description(),
        history.changes().len()
    );

    if cli.json {
        let summary = Summary {
            arming_status: controller.arming_status(),
            alarm_status: controller.alarm_status(),
            sensors: controller.sensors(),
            threat_detections: history.threat_detections(),
            history: history.changes(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    info!("Home security controller stopped");
    Ok(())
}
