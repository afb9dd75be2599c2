//! # sensorlab-runtime
//!
//! Timer-driven hosting of a `SimulationEngine`.
//!
//! A [`SimulationView`] is the scoped resource behind one mounted view: it
//! owns its engine, runs ticks on a tokio interval through a cancellable
//! [`TickHandle`] and publishes snapshots on a watch channel. Dropping the
//! view cancels the timer.

pub mod display;
pub mod error;
pub mod handle;
pub mod view;

pub use display::{drive_display, DisplayAdapter};
pub use error::RuntimeError;
pub use handle::TickHandle;
pub use view::SimulationView;
