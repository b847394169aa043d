//! Port Interfaces
//!
//! Contracts between the refresh coordination and the outside world,
//! following the hexagonal layering: the scheduler depends on
//! `SnapshotSource`, and the NSE feed client implements it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::snapshot::Snapshot;

/// Errors from a single fetch attempt.
///
/// A fetch error is terminal to that attempt only. The caller logs it and
/// leaves the snapshot store untouched; no retry is performed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or transport failure, including non-2xx responses.
    #[error("network error: {0}")]
    Network(String),

    /// Unreadable body or malformed payload.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Outbound port for fetching one complete snapshot from the feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Perform one network round-trip and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on connection failure, non-2xx status, or a
    /// malformed payload. No retry is attempted inside this call.
    async fn fetch(&self) -> Result<Snapshot, FetchError>;
}
