//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port
//! interfaces defined in the application layer, plus the service's
//! operational surfaces.

/// Environment-driven configuration.
pub mod config;

/// HTTP client adapter for the NSE feed.
pub mod feed;

/// Snapshot page and health HTTP endpoints.
pub mod http;

/// Recurring refresh timer.
pub mod scheduler;

/// Tracing setup.
pub mod telemetry;
