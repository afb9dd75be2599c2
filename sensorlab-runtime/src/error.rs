use thiserror::Error;
use tokio::task::JoinError;

use sensorlab_core::SimulationError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Simulation rejected control: {0}")]
    Rejected(#[from] SimulationError),

    #[error("No tokio runtime available to schedule ticks")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Tick task failed: {0}")]
    Join(#[from] JoinError),
}
