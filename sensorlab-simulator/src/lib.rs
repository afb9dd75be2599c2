/*!
# Sensorlab Simulator

Deterministic, timer-free runs of the simulation engine.

A run walks scheduler slots on a virtual clock instead of sleeping, applies
scripted controls at their slots and folds every accepted sample into a
BLAKE3 state hash. Equal seeds and scripts give equal hashes, which is what
`sensorlab simulate --validate-hash` checks.

## Key Components:
- **Virtual Clock:** elapsed virtual time, one tick interval per slot.
- **Scenario:** YAML-scripted controls keyed by slot.
- **Simulator:** drives the engine and hashes its output.
*/

use std::time::Duration;

use blake3::Hasher;
use serde::Serialize;
use tracing::{debug, info};

use sensorlab_core::history::Sample;
use sensorlab_core::noise::SeededNoise;
use sensorlab_core::{Control, SensorKind, SimulationEngine, SimulationError, Snapshot, ViewPreset};

pub mod error;
pub mod scenario;
pub mod virtual_clock;

pub use error::SimulatorError;
pub use scenario::{Scenario, ScheduledControl};
pub use virtual_clock::VirtualClock;

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub state_hash: String,
    /// Samples accepted over the whole run, including evicted ones.
    pub accepted_ticks: u64,
    pub elapsed_ms: u64,
    pub snapshot: Snapshot,
}

/// Headless driver for one engine.
pub struct Simulator {
    clock: VirtualClock,
    engine: SimulationEngine,
    state_hasher: Hasher,
    accepted_ticks: u64,
}

impl Simulator {
    /// Engine for `preset` showing `kind`, with noise seeded from `seed`.
    ///
    /// # Errors
    /// [`SimulationError::KindLocked`] when `preset` cannot show `kind`.
    pub fn new(preset: ViewPreset, kind: SensorKind, seed: u64) -> Result<Self, SimulationError> {
        let mut engine = SimulationEngine::new(preset, Box::new(SeededNoise::new(seed)));
        if kind != engine.kind() {
            engine.select_kind(kind)?;
        }
        Ok(Self {
            clock: VirtualClock::new(),
            engine,
            state_hasher: Hasher::new(),
            accepted_ticks: 0,
        })
    }

    pub fn apply(&mut self, control: Control) -> Result<(), SimulationError> {
        self.engine.apply(control)
    }

    /// Fires one scheduler slot: advances virtual time and ticks if running.
    pub fn step(&mut self) -> Option<Sample> {
        self.clock.advance(self.engine.preset().tick_interval());
        let outcome = self.engine.tick()?;
        self.record(&outcome.sample);
        Some(outcome.sample)
    }

    /// Fires `slots` slots with no scripted controls.
    pub fn run(&mut self, slots: u64) -> String {
        for _ in 0..slots {
            self.step();
        }
        self.state_hash()
    }

    /// Runs `scenario` from a fresh engine.
    pub fn replay(scenario: &Scenario) -> Result<SimulationReport, SimulatorError> {
        let mut simulator = Self::new(scenario.preset, scenario.kind, scenario.seed)
            .map_err(|source| SimulatorError::Rejected { slot: 0, source })?;
        info!(
            seed = scenario.seed,
            preset = %scenario.preset,
            slots = scenario.slots,
            "Replaying scenario"
        );

        let actions = scenario.ordered_actions();
        let mut pending = actions.iter().peekable();
        for slot in 0..scenario.slots {
            while let Some(action) = pending.next_if(|action| action.at_slot == slot) {
                debug!(slot, control = ?action.control, "Applying scripted control");
                simulator
                    .apply(action.control)
                    .map_err(|source| SimulatorError::Rejected { slot, source })?;
            }
            simulator.step();
        }
        Ok(simulator.report())
    }

    pub fn state_hash(&self) -> String {
        hex::encode(self.state_hasher.finalize().as_bytes())
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            state_hash: self.state_hash(),
            accepted_ticks: self.accepted_ticks,
            elapsed_ms: self.elapsed().as_millis() as u64,
            snapshot: self.engine.snapshot(),
        }
    }

    fn record(&mut self, sample: &Sample) {
        self.accepted_ticks += 1;
        self.state_hasher.update(&sample.tick.to_le_bytes());
        self.state_hasher.update(&sample.value.to_bits().to_le_bytes());
    }
}
