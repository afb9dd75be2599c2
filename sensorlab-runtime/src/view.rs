//! A mounted simulation view.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{info, instrument};

use sensorlab_core::{Control, SensorKind, SimulationEngine, Snapshot};
use sensorlab_telemetry::MetricsRecorder;

use crate::error::RuntimeError;
use crate::handle::{TickContext, TickHandle};

/// Scoped owner of one engine and its timer.
///
/// Controls take effect immediately and publish a fresh snapshot. `pause`,
/// `reset` and `select_kind` cancel the timer explicitly; dropping the view
/// cancels it too.
pub struct SimulationView {
    engine: Arc<Mutex<SimulationEngine>>,
    snapshots: Arc<watch::Sender<Snapshot>>,
    metrics: Option<Arc<MetricsRecorder>>,
    runtime: Handle,
    ticker: Option<TickHandle>,
}

impl SimulationView {
    /// Mounts `engine` on the current tokio runtime.
    ///
    /// # Errors
    /// [`RuntimeError::NoRuntime`] when called outside a tokio runtime.
    pub fn mount(
        engine: SimulationEngine,
        metrics: Option<Arc<MetricsRecorder>>,
    ) -> Result<Self, RuntimeError> {
        let runtime = Handle::try_current()?;
        let (snapshots, _) = watch::channel(engine.snapshot());
        info!(preset = %engine.preset(), kind = %engine.kind(), "View mounted");
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            snapshots: Arc::new(snapshots),
            metrics,
            runtime,
            ticker: None,
        })
    }

    /// Starts ticking. Does nothing if the timer is already live.
    pub fn start(&mut self) {
        let (period, label) = self.update(|engine| {
            engine.start();
            (engine.preset().tick_interval(), engine.preset().id())
        });
        if !self.is_ticking() {
            let ctx = TickContext {
                engine: self.engine.clone(),
                snapshots: self.snapshots.clone(),
                metrics: self.metrics.clone(),
                label,
            };
            self.ticker = Some(TickHandle::spawn(&self.runtime, period, ctx));
        }
    }

    pub fn pause(&mut self) {
        self.cancel_ticker();
        self.update(SimulationEngine::pause);
    }

    /// Start/pause button. Returns whether the view is now running.
    pub fn toggle(&mut self) -> bool {
        if self.engine.lock().is_running() {
            self.pause();
            false
        } else {
            self.start();
            true
        }
    }

    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.update(SimulationEngine::reset);
    }

    pub fn set_target(&self, value: f64) {
        self.update(|engine| engine.set_target(value));
    }

    pub fn set_noise_level(&self, value: f64) {
        self.update(|engine| engine.set_noise_level(value));
    }

    /// Switches kind; the timer stops and the state returns to the kind's defaults.
    pub fn select_kind(&mut self, kind: SensorKind) -> Result<(), RuntimeError> {
        self.update(|engine| engine.select_kind(kind))?;
        self.cancel_ticker();
        Ok(())
    }

    /// Routes a control value to the matching operation.
    pub fn apply(&mut self, control: Control) -> Result<(), RuntimeError> {
        match control {
            Control::Start => self.start(),
            Control::Pause => self.pause(),
            Control::Toggle => {
                self.toggle();
            }
            Control::Reset => self.reset(),
            Control::SetTarget(value) => self.set_target(value),
            Control::SetNoiseLevel(value) => self.set_noise_level(value),
            Control::SelectKind(kind) => self.select_kind(kind)?,
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.lock().snapshot()
    }

    /// Receiver that sees every published snapshot until the view unmounts.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickHandle::is_active)
    }

    /// Tears the view down, waiting for the tick task to finish.
    #[instrument(skip_all)]
    pub async fn unmount(mut self) -> Result<(), RuntimeError> {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown().await?;
        }
        info!("View unmounted");
        Ok(())
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Mutates the engine and publishes the result under one lock, so a
    /// concurrent tick can never overwrite a newer snapshot with an older one.
    fn update<R>(&self, f: impl FnOnce(&mut SimulationEngine) -> R) -> R {
        let mut engine = self.engine.lock();
        let out = f(&mut *engine);
        self.snapshots.send_replace(engine.snapshot());
        out
    }
}

impl Drop for SimulationView {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorlab_core::noise::{FixedNoise, SeededNoise};
    use sensorlab_core::ViewPreset;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn lab_view() -> SimulationView {
        let engine = SimulationEngine::new(ViewPreset::Lab, Box::new(FixedNoise::CENTERED));
        SimulationView::mount(engine, None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_cadence() {
        let mut view = lab_view();
        view.set_target(35.0);
        view.start();
        sleep(Duration::from_millis(5 * 300 + 50)).await;

        let snapshot = view.snapshot();
        let ticks: Vec<u64> = snapshot.history.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3, 4]);
        assert_eq!(snapshot.history[0].value, 26.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_ticks_slower() {
        let engine = SimulationEngine::new(ViewPreset::Demo, Box::new(FixedNoise::CENTERED));
        let mut view = SimulationView::mount(engine, None).unwrap();
        view.start();
        sleep(Duration::from_millis(1_050)).await;
        assert_eq!(view.snapshot().history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_one_timer() {
        let mut view = lab_view();
        view.start();
        view.start();
        sleep(Duration::from_millis(3 * 300 + 50)).await;
        assert_eq!(view.snapshot().history.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_history_and_resume_has_no_catch_up() {
        let mut view = lab_view();
        view.start();
        sleep(Duration::from_millis(2 * 300 + 50)).await;
        view.pause();
        assert!(!view.is_ticking());
        let frozen = view.snapshot().history;
        assert_eq!(frozen.len(), 2);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(view.snapshot().history, frozen);

        view.start();
        sleep(Duration::from_millis(300 + 50)).await;
        let resumed = view.snapshot().history;
        assert_eq!(resumed.len(), 3);
        assert_eq!(&resumed[..2], &frozen[..]);
        assert_eq!(resumed[2].tick, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_timer() {
        let mut view = lab_view();
        view.start();
        sleep(Duration::from_millis(650)).await;
        view.reset();
        assert!(!view.is_ticking());
        sleep(Duration::from_secs(2)).await;

        let snapshot = view.snapshot();
        assert!(snapshot.history.is_empty());
        assert!(!snapshot.running);
        assert_eq!(snapshot.current_value, 25.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_kind_stops_running_view() {
        let engine = SimulationEngine::for_kind(SensorKind::Light, Box::new(SeededNoise::new(5)));
        let mut view = SimulationView::mount(engine, None).unwrap();
        view.start();
        sleep(Duration::from_millis(650)).await;
        view.select_kind(SensorKind::Humidity).unwrap();
        assert!(!view.is_ticking());

        let snapshot = view.snapshot();
        assert_eq!(snapshot.kind, SensorKind::Humidity);
        assert_eq!(snapshot.current_value, 50.0);
        assert!(snapshot.history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_kind_switch_is_rejected_without_stopping() {
        let engine = SimulationEngine::new(ViewPreset::Demo, Box::new(FixedNoise::CENTERED));
        let mut view = SimulationView::mount(engine, None).unwrap();
        view.start();
        let err = view.select_kind(SensorKind::Pressure).unwrap_err();
        assert!(matches!(err, RuntimeError::Rejected(_)));
        assert!(view.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_follow_ticks() {
        let metrics = Arc::new(MetricsRecorder::new().unwrap());
        let engine = SimulationEngine::new(ViewPreset::Lab, Box::new(FixedNoise::CENTERED));
        let mut view = SimulationView::mount(engine, Some(metrics.clone())).unwrap();
        view.start();
        sleep(Duration::from_millis(4 * 300 + 50)).await;
        assert_eq!(metrics.ticks.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_published_snapshot_tracks_latest_control() {
        let mut view = lab_view();
        let rx = view.subscribe();
        view.start();
        sleep(Duration::from_millis(350)).await;

        view.set_target(40.0);
        assert_eq!(rx.borrow().target_value, 40.0);

        sleep(Duration::from_millis(300)).await;
        let published = rx.borrow().clone();
        assert_eq!(published.target_value, 40.0);
        assert_eq!(published.history.len(), 2);
        assert_eq!(published, view.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_closes_snapshot_stream() {
        let mut view = lab_view();
        let mut rx = view.subscribe();
        view.start();
        sleep(Duration::from_millis(350)).await;
        let _ = rx.borrow_and_update();

        drop(view);
        let closed = timeout(Duration::from_secs(5), rx.changed()).await;
        assert!(matches!(closed, Ok(Err(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_waits_for_task() {
        let mut view = lab_view();
        view.start();
        sleep(Duration::from_millis(350)).await;
        view.unmount().await.unwrap();
    }

    #[test]
    fn test_mount_outside_runtime_fails() {
        let engine = SimulationEngine::new(ViewPreset::Lab, Box::new(FixedNoise::CENTERED));
        assert!(matches!(
            SimulationView::mount(engine, None),
            Err(RuntimeError::NoRuntime(_))
        ));
    }
}
