//! Snapshot HTTP Server
//!
//! Serves the rendered snapshot page plus health endpoints.
//!
//! # Endpoints
//!
//! - `GET /snap` - Latest snapshot rendered as an HTML table
//! - `GET /health` - JSON status with snapshot staleness
//! - `GET /healthz` - Liveness probe (simple OK)

pub mod render;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json, Router, extract::State, http::StatusCode, response::Html, response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::domain::store::SnapshotStore;

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "degraded", or "unhealthy".
    pub status: HealthStatus,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Snapshot freshness details.
    pub snapshot: SnapshotStatus,
}

/// Overall health status derived from snapshot freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A snapshot was published within twice the refresh interval.
    Healthy,
    /// The last publish is older than twice the refresh interval.
    Degraded,
    /// No snapshot has ever been published.
    Unhealthy,
}

/// Snapshot freshness details.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStatus {
    /// Publish count so far (0 = never published).
    pub sequence: u64,
    /// Rows in the current snapshot.
    pub record_count: usize,
    /// The feed's capture-time string.
    pub captured_at: String,
    /// Wall-clock time of the last publish.
    pub last_published_at: Option<DateTime<Utc>>,
    /// Seconds since the last publish.
    pub staleness_secs: Option<u64>,
}

// =============================================================================
// Server State
// =============================================================================

/// Shared state for the snapshot server.
pub struct SnapshotServerState {
    version: String,
    started_at: Instant,
    refresh_interval: Duration,
    store: Arc<SnapshotStore>,
}

impl SnapshotServerState {
    /// Create new server state.
    #[must_use]
    pub fn new(version: String, refresh_interval: Duration, store: Arc<SnapshotStore>) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            refresh_interval,
            store,
        }
    }
}

// =============================================================================
// Server
// =============================================================================

/// Snapshot HTTP server.
pub struct SnapshotServer {
    port: u16,
    state: Arc<SnapshotServerState>,
    cancel: CancellationToken,
}

impl SnapshotServer {
    /// Create a new snapshot server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<SnapshotServerState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Build the router over the given state.
    ///
    /// Exposed so integration tests can serve the exact production routes
    /// on an ephemeral listener.
    #[must_use]
    pub fn router(state: Arc<SnapshotServerState>) -> Router {
        Router::new()
            .route("/snap", get(snap_handler))
            .route("/health", get(health_handler))
            .route("/healthz", get(liveness_handler))
            .with_state(state)
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), SnapshotServerError> {
        let app = Self::router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SnapshotServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Snapshot server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| SnapshotServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Snapshot server stopped");
        Ok(())
    }
}

// =============================================================================
// HTTP Handlers
// =============================================================================

/// Serve the current snapshot as an HTML page.
///
/// No request parameters are consulted; every request receives the same
/// rendering of whatever snapshot is current.
async fn snap_handler(State(state): State<Arc<SnapshotServerState>>) -> Html<String> {
    let snapshot = state.store.current();
    Html(render::render_snapshot(&snapshot))
}

async fn health_handler(State(state): State<Arc<SnapshotServerState>>) -> impl IntoResponse {
    let response = build_health_response(&state);
    let status_code = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn build_health_response(state: &SnapshotServerState) -> HealthResponse {
    let snapshot = state.store.current();
    let staleness = state.store.staleness();
    let sequence = state.store.sequence();

    HealthResponse {
        status: determine_health_status(sequence, staleness, state.refresh_interval),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        snapshot: SnapshotStatus {
            sequence,
            record_count: snapshot.records.len(),
            captured_at: snapshot.captured_at.clone(),
            last_published_at: state.store.last_published_at(),
            staleness_secs: staleness.map(|age| age.as_secs()),
        },
    }
}

fn determine_health_status(
    sequence: u64,
    staleness: Option<Duration>,
    refresh_interval: Duration,
) -> HealthStatus {
    if sequence == 0 {
        return HealthStatus::Unhealthy;
    }

    match staleness {
        Some(age) if age <= refresh_interval * 2 => HealthStatus::Healthy,
        _ => HealthStatus::Degraded,
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Snapshot server errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================
