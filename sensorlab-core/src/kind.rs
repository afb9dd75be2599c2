//! Sensor kinds and the per-kind parameters the lab view switches between.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Closed set of simulated sensor kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    #[default]
    Temperature,
    Pressure,
    Light,
    Humidity,
}

impl SensorKind {
    /// All kinds in tab order.
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Pressure,
        SensorKind::Light,
        SensorKind::Humidity,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Pressure => "pressure",
            SensorKind::Light => "light",
            SensorKind::Humidity => "humidity",
        }
    }

    /// Range, default and display passthroughs for this kind.
    pub const fn profile(self) -> KindProfile {
        match self {
            SensorKind::Temperature => KindProfile {
                kind: self,
                name: "Temperature",
                unit: "°C",
                min: -20.0,
                max: 60.0,
                default_value: 25.0,
                color: "#ef4444",
            },
            SensorKind::Pressure => KindProfile {
                kind: self,
                name: "Pressure",
                unit: "hPa",
                min: 950.0,
                max: 1050.0,
                default_value: 1013.0,
                color: "#3b82f6",
            },
            SensorKind::Light => KindProfile {
                kind: self,
                name: "Light Intensity",
                unit: "lux",
                min: 0.0,
                max: 10000.0,
                default_value: 500.0,
                color: "#eab308",
            },
            SensorKind::Humidity => KindProfile {
                kind: self,
                name: "Humidity",
                unit: "%",
                min: 0.0,
                max: 100.0,
                default_value: 50.0,
                color: "#06b6d4",
            },
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SensorKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimulationError::UnknownKind(s.to_string()))
    }
}

/// Parameters of a kind as seen by one view.
///
/// `unit` and `color` are never interpreted by the engine; they are carried
/// through to whatever renders the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KindProfile {
    pub kind: SensorKind,
    pub name: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default_value: f64,
    pub color: &'static str,
}

impl KindProfile {
    /// Constrains `value` to `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
