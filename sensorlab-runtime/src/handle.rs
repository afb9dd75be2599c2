//! Cancellable periodic tick task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use sensorlab_core::{SimulationEngine, Snapshot};
use sensorlab_telemetry::MetricsRecorder;

/// Everything a tick task needs from its view.
pub(crate) struct TickContext {
    pub engine: Arc<Mutex<SimulationEngine>>,
    pub snapshots: Arc<watch::Sender<Snapshot>>,
    pub metrics: Option<Arc<MetricsRecorder>>,
    pub label: &'static str,
}

/// Owner of a running tick task.
///
/// The task stops when [`TickHandle::cancel`] is called or the handle is
/// dropped, whichever comes first.
#[derive(Debug)]
pub struct TickHandle {
    stop: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// Spawns a task ticking the engine every `period`.
    ///
    /// The first tick fires one full period after spawning. Late ticks are
    /// delayed rather than bunched, so a stalled runtime never replays a
    /// backlog.
    pub(crate) fn spawn(runtime: &Handle, period: Duration, ctx: TickContext) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let task = runtime.spawn(run_ticks(period, ctx, stop.clone()));
        Self {
            stop,
            task: Some(task),
        }
    }

    /// Stops the task. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Cancels and waits for the task to wind down.
    pub async fn shutdown(mut self) -> Result<(), tokio::task::JoinError> {
        self.stop.store(true, Ordering::Release);
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        task.abort();
        match task.await {
            Err(e) if e.is_cancelled() => Ok(()),
            other => other,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.stop.load(Ordering::Acquire)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_ticks(period: Duration, ctx: TickContext, stop: Arc<AtomicBool>) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if stop.load(Ordering::Acquire) {
            break;
        }

        // Published under the guard so a control cannot slip in between.
        let mut engine = ctx.engine.lock();
        let Some(outcome) = engine.tick() else {
            debug!(view = ctx.label, "Engine paused, tick task exiting");
            break;
        };
        if let Some(metrics) = &ctx.metrics {
            metrics.record_tick(&outcome, engine.current_value());
        }
        ctx.snapshots.send_replace(engine.snapshot());
        drop(engine);
    }
}
