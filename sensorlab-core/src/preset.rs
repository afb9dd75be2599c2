//! View presets.
//!
//! The single-sensor demo and the multi-kind lab share one engine but differ
//! in window size, cadence, starting noise and axis range.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::kind::{KindProfile, SensorKind};

/// Fraction of the remaining distance to target covered per tick.
pub const CONVERGENCE_FACTOR: f64 = 0.1;

/// Upper bound of the noise slider.
pub const MAX_NOISE_LEVEL: f64 = 20.0;

/// Step of the target and noise sliders.
pub const SLIDER_STEP: f64 = 1.0;

/// Shown by display adapters while the history is empty.
pub const EMPTY_HISTORY_HINT: &str = "Press Start to begin simulation";

const DEMO_PROFILE: KindProfile = KindProfile {
    kind: SensorKind::Temperature,
    name: "Temperature Sensor",
    unit: "°C",
    min: -10.0,
    max: 50.0,
    default_value: 25.0,
    color: "#00bfff",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    /// Single temperature sensor with an ambient-temperature slider.
    Demo,
    /// Tabbed simulator over every `SensorKind`.
    #[default]
    Lab,
}

impl ViewPreset {
    /// Maximum number of samples retained in the rolling window.
    pub const fn window(self) -> usize {
        match self {
            ViewPreset::Demo => 30,
            ViewPreset::Lab => 50,
        }
    }

    pub const fn tick_interval(self) -> Duration {
        match self {
            ViewPreset::Demo => Duration::from_millis(500),
            ViewPreset::Lab => Duration::from_millis(300),
        }
    }

    pub const fn initial_noise_level(self) -> f64 {
        match self {
            ViewPreset::Demo => 1.0,
            ViewPreset::Lab => 5.0,
        }
    }

    pub const fn allows_kind_switch(self) -> bool {
        matches!(self, ViewPreset::Lab)
    }

    /// The demo runs at a fixed noise level; only the lab has a noise slider.
    pub const fn allows_noise_adjustment(self) -> bool {
        matches!(self, ViewPreset::Lab)
    }

    /// The profile this view uses for `kind`.
    ///
    /// The demo only ever shows temperature, on a narrower axis.
    pub const fn profile(self, kind: SensorKind) -> KindProfile {
        match self {
            ViewPreset::Demo => DEMO_PROFILE,
            ViewPreset::Lab => kind.profile(),
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            ViewPreset::Demo => "demo",
            ViewPreset::Lab => "lab",
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ViewPreset {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(ViewPreset::Demo),
            "lab" => Ok(ViewPreset::Lab),
            _ => Err(SimulationError::UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_constants() {
        assert_eq!(ViewPreset::Demo.window(), 30);
        assert_eq!(ViewPreset::Lab.window(), 50);
        assert_eq!(ViewPreset::Demo.tick_interval(), Duration::from_millis(500));
        assert_eq!(ViewPreset::Lab.tick_interval(), Duration::from_millis(300));
    }

    #[test]
    fn test_demo_ignores_requested_kind() {
        let profile = ViewPreset::Demo.profile(SensorKind::Light);
        assert_eq!(profile.kind, SensorKind::Temperature);
        assert_eq!((profile.min, profile.max), (-10.0, 50.0));
    }

    #[test]
    fn test_lab_uses_kind_profile() {
        assert_eq!(
            ViewPreset::Lab.profile(SensorKind::Pressure),
            SensorKind::Pressure.profile()
        );
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!("DEMO".parse::<ViewPreset>(), Ok(ViewPreset::Demo));
        assert!("kiosk".parse::<ViewPreset>().is_err());
    }
}
