//! ## sensorlab-core::engine
//! **Exponential smoothing toward a set point, with jitter**
//!
//! Per tick:
//!
//! ```text
//! noise = (uniform() - 0.5) * noise_level * 2
//! next  = clamp(current + (target - current) * 0.1 + noise, min, max)
//! ```
//!
//! The engine never schedules itself. A runtime calls [`SimulationEngine::tick`]
//! on its own cadence; ticks on a paused engine are ignored.

use tracing::{debug, info, trace};

use crate::error::SimulationError;
use crate::history::{History, Sample};
use crate::kind::{KindProfile, SensorKind};
use crate::noise::NoiseSource;
use crate::preset::{ViewPreset, CONVERGENCE_FACTOR};
use crate::snapshot::Snapshot;

/// What a single accepted tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub sample: Sample,
    /// Whether the raw value fell outside `[min, max]`.
    pub clamped: bool,
    /// Sample pushed out of the rolling window, if any.
    pub evicted: Option<Sample>,
}

/// State of one simulation view.
pub struct SimulationEngine {
    preset: ViewPreset,
    kind: SensorKind,
    current_value: f64,
    target_value: f64,
    noise_level: f64,
    running: bool,
    history: History,
    next_tick: u64,
    noise: Box<dyn NoiseSource>,
}

impl SimulationEngine {
    /// Creates an engine at the preset's defaults, showing temperature.
    pub fn new(preset: ViewPreset, noise: Box<dyn NoiseSource>) -> Self {
        let kind = SensorKind::default();
        let profile = preset.profile(kind);
        Self {
            preset,
            kind,
            current_value: profile.default_value,
            target_value: profile.default_value,
            noise_level: preset.initial_noise_level(),
            running: false,
            history: History::new(preset.window()),
            next_tick: 0,
            noise,
        }
    }

    /// Creates a lab engine already showing `kind`.
    pub fn for_kind(kind: SensorKind, noise: Box<dyn NoiseSource>) -> Self {
        let mut engine = Self::new(ViewPreset::Lab, noise);
        engine.load_kind(kind);
        engine
    }

    pub fn start(&mut self) {
        if !self.running {
            info!(kind = %self.kind, "Simulation started");
        }
        self.running = true;
    }

    /// Stops ticking without touching the history.
    pub fn pause(&mut self) {
        if self.running {
            info!(kind = %self.kind, samples = self.history.len(), "Simulation paused");
        }
        self.running = false;
    }

    /// Flips between running and paused; returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
        self.running
    }

    /// Stops, empties the history and returns value and target to the default.
    ///
    /// Noise level is kept.
    pub fn reset(&mut self) {
        let default_value = self.profile().default_value;
        self.running = false;
        self.history.clear();
        self.next_tick = 0;
        self.current_value = default_value;
        self.target_value = default_value;
        info!(kind = %self.kind, value = default_value, "Simulation reset");
    }

    /// Updates the set point. Range checking is the caller's job.
    pub fn set_target(&mut self, value: f64) {
        debug!(target_value = value, "Target updated");
        self.target_value = value;
    }

    /// Updates the noise amplitude for subsequent ticks.
    pub fn set_noise_level(&mut self, value: f64) {
        debug!(noise_level = value, "Noise level updated");
        self.noise_level = value;
    }

    /// Switches kind and resets to its defaults.
    ///
    /// # Errors
    /// [`SimulationError::KindLocked`] if the preset shows a single kind.
    pub fn select_kind(&mut self, kind: SensorKind) -> Result<(), SimulationError> {
        if !self.preset.allows_kind_switch() {
            return Err(SimulationError::KindLocked(self.kind));
        }
        self.load_kind(kind);
        Ok(())
    }

    fn load_kind(&mut self, kind: SensorKind) {
        info!(from = %self.kind, to = %kind, "Switching sensor kind");
        self.kind = kind;
        self.reset();
    }

    /// Advances one step if running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.running {
            return None;
        }
        Some(self.step())
    }

    fn step(&mut self) -> TickOutcome {
        let profile = self.profile();
        let noise = (self.noise.sample() - 0.5) * self.noise_level * 2.0;
        let raw = self.current_value
            + (self.target_value - self.current_value) * CONVERGENCE_FACTOR
            + noise;
        let next = profile.clamp(raw);

        let sample = Sample {
            tick: self.next_tick,
            value: round_to_tenth(next),
        };
        self.next_tick += 1;
        let evicted = self.history.push(sample);
        self.current_value = next;

        let clamped = raw != next;
        trace!(tick = sample.tick, value = sample.value, raw, clamped, "Tick");
        TickOutcome {
            sample,
            clamped,
            evicted,
        }
    }

    pub fn profile(&self) -> KindProfile {
        self.preset.profile(self.kind)
    }

    pub fn preset(&self) -> ViewPreset {
        self.preset
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        let profile = self.profile();
        Snapshot {
            kind: self.kind,
            unit: profile.unit,
            color: profile.color,
            min: profile.min,
            max: profile.max,
            current_value: self.current_value,
            target_value: self.target_value,
            noise_level: self.noise_level,
            running: self.running,
            history: self.history.to_vec(),
        }
    }
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("preset", &self.preset)
            .field("kind", &self.kind)
            .field("current_value", &self.current_value)
            .field("target_value", &self.target_value)
            .field("noise_level", &self.noise_level)
            .field("running", &self.running)
            .field("samples", &self.history.len())
            .finish()
    }
}

#[inline]
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FixedNoise, SeededNoise};
    use crate::preset::MAX_NOISE_LEVEL;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn quiet(preset: ViewPreset) -> SimulationEngine {
        SimulationEngine::new(preset, Box::new(FixedNoise::CENTERED))
    }

    fn seeded(kind: SensorKind, seed: u64) -> SimulationEngine {
        SimulationEngine::for_kind(kind, Box::new(SeededNoise::new(seed)))
    }

    #[test]
    fn test_single_step_converges_by_tenth() {
        let mut engine = quiet(ViewPreset::Lab);
        engine.set_target(35.0);
        engine.start();
        let outcome = engine.tick().expect("running engine ticks");
        assert!((engine.current_value() - 26.0).abs() < 1e-9);
        assert_eq!(outcome.sample, Sample { tick: 0, value: 26.0 });
        assert!(!outcome.clamped);
    }

    #[test]
    fn test_ten_steps_follow_geometric_decay() {
        let mut engine = quiet(ViewPreset::Lab);
        engine.set_target(35.0);
        engine.start();
        let mut distance = (35.0 - engine.current_value()).abs();
        for _ in 0..10 {
            engine.tick();
            let next_distance = (35.0 - engine.current_value()).abs();
            assert!(next_distance < distance);
            distance = next_distance;
        }
        let expected = 35.0 - 10.0 * 0.9_f64.powi(10);
        assert!((engine.current_value() - expected).abs() < 1e-9);
        assert!((engine.current_value() - 31.5).abs() < 0.05);
    }

    #[test]
    fn test_paused_engine_does_not_tick() {
        let mut engine = quiet(ViewPreset::Lab);
        assert!(engine.tick().is_none());
        engine.start();
        engine.tick();
        engine.tick();
        engine.pause();
        let before = engine.history().to_vec();
        assert!(engine.tick().is_none());
        assert_eq!(engine.history().to_vec(), before);

        engine.start();
        let resumed = engine.tick().unwrap();
        assert_eq!(resumed.sample.tick, 2);
        assert_eq!(&engine.history().to_vec()[..2], &before[..]);
    }

    #[test]
    fn test_start_and_pause_are_idempotent() {
        let mut engine = quiet(ViewPreset::Demo);
        engine.start();
        engine.start();
        assert!(engine.is_running());
        engine.pause();
        engine.pause();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_toggle() {
        let mut engine = quiet(ViewPreset::Demo);
        assert!(engine.toggle());
        assert!(!engine.toggle());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut engine = seeded(SensorKind::Humidity, 9);
        engine.set_target(90.0);
        engine.set_noise_level(12.0);
        engine.start();
        for _ in 0..20 {
            engine.tick();
        }
        engine.reset();
        assert!(!engine.is_running());
        assert!(engine.history().is_empty());
        assert_eq!(engine.current_value(), 50.0);
        assert_eq!(engine.target_value(), 50.0);
        assert_eq!(engine.noise_level(), 12.0);

        engine.start();
        assert_eq!(engine.tick().unwrap().sample.tick, 0);
    }

    #[test]
    fn test_select_kind_reinitialises_and_stops() {
        let mut engine = seeded(SensorKind::Temperature, 1);
        engine.start();
        engine.tick();
        engine.select_kind(SensorKind::Pressure).unwrap();
        assert_eq!(engine.kind(), SensorKind::Pressure);
        assert!(!engine.is_running());
        assert!(engine.history().is_empty());
        assert_eq!(engine.current_value(), 1013.0);
        assert_eq!(engine.target_value(), 1013.0);
    }

    #[test]
    fn test_demo_rejects_kind_switch() {
        let mut engine = quiet(ViewPreset::Demo);
        assert_eq!(
            engine.select_kind(SensorKind::Light),
            Err(SimulationError::KindLocked(SensorKind::Temperature))
        );
        assert_eq!(engine.kind(), SensorKind::Temperature);
    }

    #[test]
    fn test_demo_clamps_to_its_axis() {
        let mut engine = SimulationEngine::new(ViewPreset::Demo, Box::new(FixedNoise(0.999)));
        engine.set_target(50.0);
        engine.set_noise_level(MAX_NOISE_LEVEL);
        engine.start();
        let mut clamped = 0;
        for _ in 0..100 {
            if engine.tick().unwrap().clamped {
                clamped += 1;
            }
            assert!(engine.current_value() <= 50.0);
        }
        assert!(clamped > 0);
    }

    #[test]
    fn test_window_is_bounded_per_preset() {
        for preset in [ViewPreset::Demo, ViewPreset::Lab] {
            let mut engine = quiet(preset);
            engine.start();
            for _ in 0..(preset.window() * 3) {
                engine.tick();
            }
            assert_eq!(engine.history().len(), preset.window());
            assert_eq!(
                engine.history().latest().unwrap().tick,
                (preset.window() * 3 - 1) as u64
            );
        }
    }

    #[test]
    fn test_snapshot_passes_unit_and_color_through() {
        let engine = seeded(SensorKind::Light, 4);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.unit, "lux");
        assert_eq!(snapshot.color, "#eab308");
        assert_eq!(quiet(ViewPreset::Demo).snapshot().color, "#00bfff");
        assert_eq!(snapshot.current_value, 500.0);
        assert!(!snapshot.running);
        assert!(snapshot.history.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_lifecycle_is_logged() {
        let mut engine = quiet(ViewPreset::Lab);
        engine.start();
        engine.reset();
        assert!(logs_contain("Simulation started"));
        assert!(logs_contain("Simulation reset"));
    }

    #[traced_test]
    #[test]
    fn test_clamped_tick_is_traced_once() {
        let mut engine = SimulationEngine::new(ViewPreset::Demo, Box::new(FixedNoise(1.0)));
        engine.set_target(50.0);
        engine.set_noise_level(MAX_NOISE_LEVEL);
        engine.start();
        for _ in 0..5 {
            engine.tick();
        }
        assert!(logs_contain("clamped=true"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("tick=0 ")).count() {
                1 => Ok(()),
                n => Err(format!("expected one trace for tick 0, got {n}")),
            }
        });
    }

    fn any_kind() -> impl Strategy<Value = SensorKind> {
        prop::sample::select(SensorKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_history_never_exceeds_window(seed in any::<u64>(), ticks in 0usize..200) {
            let mut engine = SimulationEngine::new(ViewPreset::Lab, Box::new(SeededNoise::new(seed)));
            engine.start();
            for _ in 0..ticks {
                engine.tick();
                prop_assert!(engine.history().len() <= ViewPreset::Lab.window());
            }
        }

        #[test]
        fn prop_ticks_increase_by_one(seed in any::<u64>(), ticks in 2usize..150) {
            let mut engine = SimulationEngine::new(ViewPreset::Demo, Box::new(SeededNoise::new(seed)));
            engine.start();
            for _ in 0..ticks {
                engine.tick();
            }
            let samples = engine.history().to_vec();
            for pair in samples.windows(2) {
                prop_assert_eq!(pair[1].tick, pair[0].tick + 1);
            }
        }

        #[test]
        fn prop_value_stays_in_range_at_max_noise(kind in any_kind(), seed in any::<u64>()) {
            let mut engine = seeded(kind, seed);
            let profile = engine.profile();
            engine.set_target(profile.max);
            engine.set_noise_level(MAX_NOISE_LEVEL);
            engine.start();
            for _ in 0..200 {
                let outcome = engine.tick().unwrap();
                prop_assert!(outcome.sample.value <= profile.max);
                prop_assert!(profile.contains(engine.current_value()));
            }
        }

        #[test]
        fn prop_kind_switch_resets(from in any_kind(), to in any_kind(), seed in any::<u64>()) {
            let mut engine = seeded(from, seed);
            engine.start();
            for _ in 0..10 {
                engine.tick();
            }
            engine.select_kind(to).unwrap();
            prop_assert_eq!(engine.current_value(), to.profile().default_value);
            prop_assert!(engine.history().is_empty());
        }
    }
}
