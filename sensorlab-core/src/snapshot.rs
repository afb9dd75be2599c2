//! Read-only views of an engine for the chart and readout collaborators.

use std::fmt;

use serde::Serialize;

use crate::history::Sample;
use crate::kind::SensorKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub kind: SensorKind,
    pub unit: &'static str,
    /// Series colour as `#rrggbb`.
    pub color: &'static str,
    /// Axis bounds of the active profile.
    pub min: f64,
    pub max: f64,
    pub current_value: f64,
    pub target_value: f64,
    pub noise_level: f64,
    pub running: bool,
    pub history: Vec<Sample>,
}

impl Snapshot {
    pub fn readout(&self) -> Readout {
        Readout::new(self.kind, self.current_value, self.unit)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.history.last()
    }
}

/// Colour band of a temperature reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingBand {
    Cold,
    Cool,
    Warm,
    Hot,
}

impl ReadingBand {
    pub fn for_temperature(celsius: f64) -> Self {
        if celsius < 15.0 {
            ReadingBand::Cold
        } else if celsius < 25.0 {
            ReadingBand::Cool
        } else if celsius < 35.0 {
            ReadingBand::Warm
        } else {
            ReadingBand::Hot
        }
    }
}

/// Current-value readout, e.g. `26.0°C`.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub value: f64,
    pub unit: &'static str,
    /// Only temperature readings are banded.
    pub band: Option<ReadingBand>,
}

impl Readout {
    pub fn new(kind: SensorKind, value: f64, unit: &'static str) -> Self {
        let band = match kind {
            SensorKind::Temperature => Some(ReadingBand::for_temperature(value)),
            _ => None,
        };
        Self { value, unit, band }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}{}", self.value, self.unit)
    }
}
