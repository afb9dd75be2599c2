use std::path::PathBuf;

use thiserror::Error;

use sensorlab_core::SimulationError;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Scenario file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario format error: {0}")]
    Serde(#[from] serde_yaml::Error),

    #[error("Control rejected at slot {slot}: {source}")]
    Rejected {
        slot: u64,
        #[source]
        source: SimulationError,
    },
}
