//! Simulation view configuration.
//!
//! Only the knobs a user could reach from the view are configurable. The
//! convergence factor, tick cadence and window size belong to the preset.

use serde::{Deserialize, Serialize};
use validator::{self, Validate, ValidationError};

use sensorlab_core::{SensorKind, ViewPreset};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Default)]
#[validate(schema(function = validate_noise_step))]
pub struct SimulationConfig {
    /// Seed for deterministic noise. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Which view to mount.
    #[serde(default)]
    pub preset: ViewPreset,

    /// Initial sensor kind (lab view only).
    #[serde(default)]
    pub kind: SensorKind,

    /// Initial noise level, on the slider's `[0, 20]` scale. When absent the
    /// preset's own starting level applies. The demo view ignores it.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 20.0))]
    pub noise_level: Option<f64>,
}

impl SimulationConfig {
    /// Noise level to apply on top of the preset, if any.
    pub fn noise_override(&self, preset: ViewPreset) -> Option<f64> {
        self.noise_level.filter(|_| preset.allows_noise_adjustment())
    }
}

fn validate_noise_step(config: &SimulationConfig) -> Result<(), ValidationError> {
    config
        .noise_level
        .map_or(Ok(()), validation::validate_whole_step)
}
