//! # sensorlab-core
//!
//! Value-tracking simulation engine behind the sensor demo and lab views.
//!
//! Each tick nudges the displayed reading toward a user-set target by a fixed
//! smoothing factor, adds uniform jitter, clamps to the view's axis range and
//! appends the rounded result to a bounded rolling window.
//!
//! ### Key Submodules:
//! - `kind`: closed set of sensor kinds and their display profiles
//! - `preset`: the two views (single-sensor demo, multi-kind lab) and their constants
//! - `noise`: seedable uniform noise sources
//! - `history`: FIFO rolling window of samples
//! - `engine`: the synchronous `SimulationEngine`
//! - `control`: user inputs as values
//! - `snapshot`: read-only views handed to the display layer
//!
//! No timers live here; scheduling belongs to `sensorlab-runtime`.

pub mod control;
pub mod engine;
pub mod error;
pub mod history;
pub mod kind;
pub mod noise;
pub mod preset;
pub mod snapshot;

pub mod prelude {
    pub use crate::control::*;
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::history::*;
    pub use crate::kind::*;
    pub use crate::noise::*;
    pub use crate::preset::*;
    pub use crate::snapshot::*;
}

pub use control::Control;
pub use engine::{SimulationEngine, TickOutcome};
pub use error::SimulationError;
pub use kind::{KindProfile, SensorKind};
pub use preset::ViewPreset;
pub use snapshot::{Readout, ReadingBand, Snapshot};
