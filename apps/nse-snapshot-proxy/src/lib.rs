#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! NSE Snapshot Proxy - Periodic Market Data Snapshot Server
//!
//! Fetches a remote JSON market-data feed (the NSE "nifty gainers"
//! endpoint) on a fixed interval, keeps the most recent snapshot in
//! memory, and serves it back as an HTML table over HTTP on demand.
//!
//! The refresh timer and the request handlers never wait on each other:
//! a fetch builds a complete snapshot off to the side and publishes it
//! with a single pointer swap, while readers keep serving whatever was
//! published last.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: Core snapshot types and the shared store
//!   - `snapshot`: One immutable feed capture and its records
//!   - `store`: Concurrency-safe publish/current holder
//!
//! - **Application**: Port definitions
//!   - `ports`: The `SnapshotSource` fetch contract
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `feed`: HTTP client for the NSE feed
//!   - `scheduler`: Recurring refresh timer
//!   - `http`: Snapshot page and health endpoints
//!   - `config`: Environment-driven configuration
//!   - `telemetry`: Tracing setup
//!
//! # Data Flow
//!
//! ```text
//! timer tick --> NseFeedClient --> SnapshotStore <-- GET /snap --> HTML
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core snapshot types with no external dependencies.
pub mod domain;

/// Application layer - Port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::snapshot::{MarketRecord, Snapshot};
pub use domain::store::SnapshotStore;

// Ports
pub use application::ports::{FetchError, SnapshotSource};

// Infrastructure config
pub use infrastructure::config::{
    ConfigError, FeedSettings, RefreshSettings, ServerSettings, ServiceConfig,
};

// Feed client
pub use infrastructure::feed::NseFeedClient;

// Refresh scheduler
pub use infrastructure::scheduler::RefreshScheduler;

// Snapshot server (for integration tests)
pub use infrastructure::http::{
    HealthResponse, HealthStatus, SnapshotServer, SnapshotServerError, SnapshotServerState,
    SnapshotStatus,
};

// Renderer
pub use infrastructure::http::render::render_snapshot;
