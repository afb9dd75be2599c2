//! # Sensorlab Telemetry
//!
//! Logging setup and simulation metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
