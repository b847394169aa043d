//! Snapshot Store
//!
//! Holds the single current snapshot shared between the refresh path
//! (writer) and the HTTP handlers (readers). Publishing swaps an
//! immutable `Arc<Snapshot>` wholesale, so a reader either sees the
//! previous snapshot or the new one - never a mix of the two - and a
//! failed fetch leaves the store untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::snapshot::Snapshot;

/// Concurrency-safe holder for the current market snapshot.
///
/// The refresh path is the sole writer; request tasks are readers.
/// Overlapping publishes are permitted: the one that publishes last wins,
/// and the publish sequence makes that ordering observable.
#[derive(Debug)]
pub struct SnapshotStore {
    current: parking_lot::RwLock<Arc<Snapshot>>,
    sequence: AtomicU64,
    last_published_at: parking_lot::RwLock<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    /// Create an empty store: sequence 0, nothing published yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: parking_lot::RwLock::new(Arc::new(Snapshot::default())),
            sequence: AtomicU64::new(0),
            last_published_at: parking_lot::RwLock::new(None),
        }
    }

    /// Replace the stored snapshot wholesale.
    ///
    /// Returns the sequence number assigned to this publish.
    pub fn publish(&self, snapshot: Snapshot) -> u64 {
        *self.current.write() = Arc::new(snapshot);
        *self.last_published_at.write() = Some(Utc::now());
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The latest published snapshot, or the empty snapshot if none yet.
    ///
    /// Never waits on a fetch in progress; the lock only guards the
    /// pointer swap.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Number of publishes so far (0 = never published).
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Wall-clock time of the most recent publish.
    #[must_use]
    pub fn last_published_at(&self) -> Option<DateTime<Utc>> {
        *self.last_published_at.read()
    }

    /// Elapsed time since the most recent publish.
    #[must_use]
    pub fn staleness(&self) -> Option<Duration> {
        self.last_published_at()
            .map(|at| (Utc::now() - at).to_std().unwrap_or(Duration::ZERO))
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
