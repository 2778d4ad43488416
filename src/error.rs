use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum SecurityError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Sensor already registered: {0}")]
    DuplicateSensor(String),

    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    #[error("Image classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SecurityError>;
