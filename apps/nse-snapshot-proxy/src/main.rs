//! NSE Snapshot Proxy Binary
//!
//! Starts the periodic snapshot refresh and the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nse-snapshot-proxy
//! ```
//!
//! # Environment Variables
//!
//! All optional:
//! - `SNAPSHOT_FEED_URL`: Feed endpoint (default: NSE nifty gainers)
//! - `SNAPSHOT_FEED_USER_AGENT`: User-Agent header for feed requests
//! - `SNAPSHOT_FEED_ACCEPT`: Accept header for feed requests
//! - `SNAPSHOT_REFRESH_INTERVAL_SECS`: Seconds between fetches (default: 300)
//! - `SNAPSHOT_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
//! - `SNAPSHOT_HTTP_PORT`: HTTP listen port (default: 5000)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use nse_snapshot_proxy::domain::store::SnapshotStore;
use nse_snapshot_proxy::infrastructure::config::ServiceConfig;
use nse_snapshot_proxy::infrastructure::feed::NseFeedClient;
use nse_snapshot_proxy::infrastructure::http::{SnapshotServer, SnapshotServerState};
use nse_snapshot_proxy::infrastructure::scheduler::RefreshScheduler;
use nse_snapshot_proxy::infrastructure::telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting NSE snapshot proxy");

    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let store = Arc::new(SnapshotStore::new());

    let source =
        Arc::new(NseFeedClient::new(config.feed.clone()).context("failed to build feed client")?);

    let scheduler = Arc::new(RefreshScheduler::new(
        source,
        Arc::clone(&store),
        config.refresh.interval,
        shutdown_token.clone(),
    ));
    let scheduler_task = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move { scheduler.run().await }
    });

    let state = Arc::new(SnapshotServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        config.refresh.interval,
        Arc::clone(&store),
    ));
    let server = SnapshotServer::new(config.server.http_port, state, shutdown_token.clone());
    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "Snapshot server error");
        }
    });

    tracing::info!("Snapshot proxy ready");

    await_shutdown(shutdown_token).await;

    let _ = scheduler_task.await;
    let _ = server_task.await;

    tracing::info!("Snapshot proxy stopped");
    Ok(())
}

/// Load a .env file if one is present.
fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Log the parsed configuration.
fn log_config(config: &ServiceConfig) {
    tracing::info!(
        feed_url = %config.feed.url,
        refresh_interval_secs = config.refresh.interval.as_secs(),
        request_timeout_secs = config.feed.request_timeout.as_secs(),
        http_port = config.server.http_port,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
