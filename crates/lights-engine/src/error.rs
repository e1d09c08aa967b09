use std::path::PathBuf;

use lights_hardware::HardwareError;
use thiserror::Error;

/// Errors surfaced by the lights engine.
#[derive(Debug, Error)]
pub enum LightsError {
    /// A light was requested by a name the device does not register.
    #[error("Unknown light target: {0}")]
    UnknownTarget(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("Failed to read configuration {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more control writes of a light update failed.
    ///
    /// Every write of the update was still attempted; `first` is the
    /// earliest failure.
    #[error("{failed} of {attempted} control writes failed, first: {first}")]
    WriteFailed {
        attempted: usize,
        failed: usize,
        #[source]
        first: HardwareError,
    },
}

impl From<lights_core::Error> for LightsError {
    fn from(error: lights_core::Error) -> Self {
        match error {
            lights_core::Error::UnknownTarget(name) => Self::UnknownTarget(name),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Result type alias for lights engine operations.
pub type Result<T> = std::result::Result<T, LightsError>;
