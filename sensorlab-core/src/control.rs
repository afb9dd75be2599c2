//! User controls as data, so scripted scenarios and interactive views drive
//! the engine through the same path.

use serde::{Deserialize, Serialize};

use crate::engine::SimulationEngine;
use crate::error::SimulationError;
use crate::kind::SensorKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Start,
    Pause,
    Toggle,
    Reset,
    SetTarget(f64),
    SetNoiseLevel(f64),
    SelectKind(SensorKind),
}

impl SimulationEngine {
    /// Applies one control. Only a kind switch can be refused.
    pub fn apply(&mut self, control: Control) -> Result<(), SimulationError> {
        match control {
            Control::Start => self.start(),
            Control::Pause => self.pause(),
            Control::Toggle => {
                self.toggle();
            }
            Control::Reset => self.reset(),
            Control::SetTarget(value) => self.set_target(value),
            Control::SetNoiseLevel(value) => self.set_noise_level(value),
            Control::SelectKind(kind) => self.select_kind(kind)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::FixedNoise;
    use crate::preset::ViewPreset;

    #[test]
    fn test_apply_sequence() {
        let mut engine = SimulationEngine::new(ViewPreset::Lab, Box::new(FixedNoise::CENTERED));
        for control in [
            Control::SelectKind(SensorKind::Humidity),
            Control::SetTarget(60.0),
            Control::Start,
        ] {
            engine.apply(control).unwrap();
        }
        engine.tick();
        assert_eq!(engine.current_value(), 51.0);
        engine.apply(Control::Toggle).unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_controls_deserialize_from_yaml_tags() {
        let control: Control = serde_yaml::from_str("!set_target 12.5").unwrap();
        assert_eq!(control, Control::SetTarget(12.5));
        let control: Control = serde_yaml::from_str("start").unwrap();
        assert_eq!(control, Control::Start);
    }
}
