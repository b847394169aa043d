//! Refresh Scheduler
//!
//! Recurring timer that dispatches an independent fetch-and-publish task
//! on every tick. Ticks never wait for fetches, so a slow feed cannot
//! stall the schedule; overlapping fetches race and the last publish
//! wins. A failed fetch is logged and dropped - the store keeps serving
//! whatever was published last.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::application::ports::SnapshotSource;
use crate::domain::store::SnapshotStore;

/// Periodic refresh driver for the snapshot store.
///
/// Running from process startup until its cancellation token fires; the
/// token stops the timer but leaves already-dispatched fetches to run to
/// completion or failure on their own.
pub struct RefreshScheduler {
    source: Arc<dyn SnapshotSource>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    cancel: CancellationToken,
    dispatched: AtomicU64,
}

impl RefreshScheduler {
    /// Create a scheduler. Nothing happens until [`run`](Self::run) is
    /// awaited.
    #[must_use]
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        store: Arc<SnapshotStore>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            store,
            interval,
            cancel,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Number of fetch tasks dispatched so far.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Run the tick loop until the cancellation token fires.
    ///
    /// The first tick fires one full interval after startup; the window
    /// before the first successful fetch is served from the empty
    /// snapshot.
    pub async fn run(&self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Refresh scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.dispatch(),
                () = self.cancel.cancelled() => break,
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }

    /// Spawn one fire-and-forget fetch-and-publish task.
    fn dispatch(&self) {
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let tick = self.dispatched.fetch_add(1, Ordering::Relaxed) + 1;

        tokio::spawn(async move {
            match source.fetch().await {
                Ok(snapshot) => {
                    let records = snapshot.records.len();
                    let sequence = store.publish(snapshot);
                    tracing::info!(tick, sequence, records, "Snapshot published");
                }
                Err(error) => {
                    tracing::warn!(tick, error = %error, "Snapshot refresh failed");
                }
            }
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
