//! Scripted control sequences for reproducible runs.
//!
//! ```yaml
//! seed: 42
//! preset: lab
//! kind: temperature
//! slots: 120
//! actions:
//!   - at_slot: 0
//!     control: start
//!   - at_slot: 40
//!     control: !set_target 55
//!   - at_slot: 80
//!     control: !select_kind humidity
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use sensorlab_core::{Control, SensorKind, ViewPreset};

use crate::error::SimulatorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    #[serde(default)]
    pub preset: ViewPreset,
    #[serde(default)]
    pub kind: SensorKind,
    /// Number of scheduler slots to run. A slot produces a sample only while running.
    pub slots: u64,
    #[serde(default)]
    pub actions: Vec<ScheduledControl>,
}

/// A control applied just before scheduler slot `at_slot` fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledControl {
    pub at_slot: u64,
    pub control: Control,
}

impl Scenario {
    /// Unscripted run: start at slot 0 and tick `slots` times.
    pub fn free_running(seed: u64, preset: ViewPreset, kind: SensorKind, slots: u64) -> Self {
        Self {
            seed,
            preset,
            kind,
            slots,
            actions: vec![ScheduledControl {
                at_slot: 0,
                control: Control::Start,
            }],
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulatorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SimulatorError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), SimulatorError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Actions in slot order; ties keep their file order.
    pub(crate) fn ordered_actions(&self) -> Vec<ScheduledControl> {
        let mut actions = self.actions.clone();
        actions.sort_by_key(|action| action.at_slot);
        actions
    }
}
