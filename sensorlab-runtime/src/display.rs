//! Bridge between a view's snapshot stream and whatever draws it.

use tokio::sync::watch;

use sensorlab_core::Snapshot;

/// Renders snapshots: a chart, a readout, a log line.
pub trait DisplayAdapter: Send {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Renders the current snapshot, then every change, until the view unmounts.
pub async fn drive_display<D>(mut snapshots: watch::Receiver<Snapshot>, adapter: &mut D)
where
    D: DisplayAdapter + ?Sized,
{
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        adapter.render(&snapshot);
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}
