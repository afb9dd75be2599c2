use thiserror::Error;

use crate::kind::SensorKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Unknown sensor kind: {0}")]
    UnknownKind(String),

    #[error("Unknown view preset: {0}")]
    UnknownPreset(String),

    #[error("Sensor kind is fixed to {0} in this view")]
    KindLocked(SensorKind),
}
