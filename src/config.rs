use crate::error::{Result, SecurityError};
use crate::sensors::SensorType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Confidence (percent) a detected label must exceed to count as a threat.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Label the detector looks for in camera frames.
pub const DEFAULT_TARGET_LABEL: &str = "cat";

/// Load environment variables from `.env` in the working directory.
pub fn load_dotenv() -> usize {
    load_dotenv_from(Path::new(".env"))
}

/// Load environment variables from the given file.
///
/// Variables already present in the process environment win over the file.
/// Returns the number of variables that were set.
pub fn load_dotenv_from(path: &Path) -> usize {
    let mut loaded = 0;
    for (key, value) in read_dotenv(path) {
        if std::env::var(&key).is_err() {
            // SAFETY: called once at startup, before the tokio runtime spawns workers
            unsafe { std::env::set_var(&key, &value) };
            loaded += 1;
        }
    }
    loaded
}

/// Parse a `.env` file into key/value pairs without touching the environment.
///
/// A missing or unreadable file yields no pairs.
pub fn read_dotenv(path: &Path) -> Vec<(String, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter_map(parse_env_line)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Split a `KEY=value` line, dropping comments and surrounding quotes.
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let mut value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value = &value[1..value.len() - 1];
    }
    Some((key, value))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub detector: DetectorConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Percent, `0.0..=100.0`.
    pub confidence_threshold: f32,
    pub target_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub sensors: Vec<SensorSpec>,
    pub sensor_interval_secs: u64,
    pub frame_interval_secs: u64,
    pub arming_interval_secs: u64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub name: String,
    pub sensor_type: SensorType,
}

impl SensorSpec {
    /// Parse `name:type`, e.g. `Front Door:door`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, kind) = spec.rsplit_once(':').ok_or_else(|| {
            SecurityError::InvalidArgument(format!("sensor spec '{spec}' is not name:type"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SecurityError::InvalidArgument(format!(
                "sensor spec '{spec}' has an empty name"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            sensor_type: kind.trim().parse()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig {
                confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
                target_label: DEFAULT_TARGET_LABEL.to_string(),
            },
            simulation: SimulationConfig {
                sensors: vec![
                    SensorSpec {
                        name: "Front Door".to_string(),
                        sensor_type: SensorType::Door,
                    },
                    SensorSpec {
                        name: "Kitchen Window".to_string(),
                        sensor_type: SensorType::Window,
                    },
                    SensorSpec {
                        name: "Hallway Motion".to_string(),
                        sensor_type: SensorType::Motion,
                    },
                ],
                sensor_interval_secs: 5,
                frame_interval_secs: 7,
                arming_interval_secs: 30,
                seed: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threshold) = std::env::var("ALARM_CONFIDENCE_THRESHOLD") {
            config.detector.confidence_threshold = threshold.trim().parse().map_err(|_| {
                SecurityError::InvalidArgument(format!(
                    "ALARM_CONFIDENCE_THRESHOLD '{threshold}' is not a number"
                ))
            })?;
        }
        if let Ok(label) = std::env::var("ALARM_TARGET_LABEL") {
            config.detector.target_label = label;
        }

        if let Ok(sensors) = std::env::var("SIM_SENSORS") {
            config.simulation.sensors = sensors
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(SensorSpec::parse)
                .collect::<Result<Vec<_>>>()?;
        }
        if let Ok(secs) = std::env::var("SIM_SENSOR_INTERVAL_SECS")
            && let Ok(s) = secs.parse()
        {
            config.simulation.sensor_interval_secs = s;
        }
        if let Ok(secs) = std::env::var("SIM_FRAME_INTERVAL_SECS")
            && let Ok(s) = secs.parse()
        {
            config.simulation.frame_interval_secs = s;
        }
        if let Ok(secs) = std::env::var("SIM_ARMING_INTERVAL_SECS")
            && let Ok(s) = secs.parse()
        {
            config.simulation.arming_interval_secs = s;
        }
        if let Ok(seed) = std::env::var("SIM_SEED")
            && let Ok(s) = seed.parse()
        {
            config.simulation.seed = Some(s);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.detector.confidence_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(SecurityError::InvalidArgument(format!(
                "confidence threshold {threshold} outside 0..=100"
            )));
        }
        if self.detector.target_label.trim().is_empty() {
            return Err(SecurityError::InvalidArgument(
                "target label must not be empty".to_string(),
            ));
        }
        let sim = &self.simulation;
        if sim.sensor_interval_secs == 0 || sim.frame_interval_secs == 0 || sim.arming_interval_secs == 0
        {
            return Err(SecurityError::InvalidArgument(
                "simulation intervals must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}
