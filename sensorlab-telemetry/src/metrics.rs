//! ## sensorlab-telemetry::metrics
//! **Prometheus counters for the tick loop**

use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

use sensorlab_core::TickOutcome;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub ticks: IntCounter,
    pub clamped_ticks: IntCounter,
    pub evicted_samples: IntCounter,
    pub current_value: Gauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let ticks = IntCounter::new("sensorlab_ticks_total", "Accepted simulation ticks")?;
        let clamped_ticks = IntCounter::new(
            "sensorlab_clamped_ticks_total",
            "Ticks whose raw value left the axis range",
        )?;
        let evicted_samples = IntCounter::new(
            "sensorlab_evicted_samples_total",
            "Samples dropped from the rolling window",
        )?;
        let current_value = Gauge::new("sensorlab_current_value", "Latest simulated reading")?;

        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(clamped_ticks.clone()))?;
        registry.register(Box::new(evicted_samples.clone()))?;
        registry.register(Box::new(current_value.clone()))?;

        Ok(Self {
            registry,
            ticks,
            clamped_ticks,
            evicted_samples,
            current_value,
        })
    }

    pub fn record_tick(&self, outcome: &TickOutcome, current_value: f64) {
        self.ticks.inc();
        if outcome.clamped {
            self.clamped_ticks.inc();
        }
        if outcome.evicted.is_some() {
            self.evicted_samples.inc();
        }
        self.current_value.set(current_value);
    }

    /// Renders every registered metric in the text exposition format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
