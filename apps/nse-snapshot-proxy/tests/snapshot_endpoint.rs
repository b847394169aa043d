//! Snapshot Endpoint Integration Tests
//!
//! Serves the production router on an ephemeral listener and drives it
//! with a real HTTP client, covering the success path, the empty-store
//! path, and the fetch-failure path end to end.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use nse_snapshot_proxy::{
    FetchError, MarketRecord, RefreshScheduler, Snapshot, SnapshotServer, SnapshotServerState,
    SnapshotSource, SnapshotStore,
};

const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// A source that always fails, as if the feed were unreachable.
struct FailingSource;

#[async_trait]
impl SnapshotSource for FailingSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        Err(FetchError::Network("connection refused".to_string()))
    }
}

/// A source that always returns the same fixed snapshot.
struct FixedSource(Snapshot);

#[async_trait]
impl SnapshotSource for FixedSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        Ok(self.0.clone())
    }
}

async fn setup_test_server(store: Arc<SnapshotStore>) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let state = Arc::new(SnapshotServerState::new(
        "test-0.0.1".to_string(),
        REFRESH_INTERVAL,
        store,
    ));
    let app = SnapshotServer::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, server_handle)
}

fn make_test_snapshot() -> Snapshot {
    Snapshot {
        captured_at: "10:00".to_string(),
        records: vec![MarketRecord {
            symbol: "ABC".to_string(),
            series: "EQ".to_string(),
            open_price: "100".to_string(),
            high_price: "110".to_string(),
            low_price: "95".to_string(),
            ltp: "105".to_string(),
            previous_price: "99".to_string(),
            net_price: "6.06".to_string(),
            traded_quantity: "123456".to_string(),
            turnover_in_lakhs: "129.63".to_string(),
            last_corp_announcement_date: "01-Jan-2016".to_string(),
            last_corp_announcement: "Dividend".to_string(),
        }],
    }
}

// =============================================================================
// Snapshot Page Tests
// =============================================================================

#[tokio::test]
async fn snap_returns_published_snapshot() {
    let store = Arc::new(SnapshotStore::new());
    store.publish(make_test_snapshot());
    let (addr, handle) = setup_test_server(Arc::clone(&store)).await;

    let response = reqwest::get(format!("http://{addr}/snap")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = response.text().await.unwrap();
    assert!(body.contains("Snapshot Time: 10:00"));
    assert!(body.contains("<td>ABC</td>"));
    assert!(body.contains("<td>EQ</td>"));
    assert!(body.contains("<td>100</td>"));

    handle.abort();
}

#[tokio::test]
async fn snap_before_first_publish_renders_empty_page() {
    let store = Arc::new(SnapshotStore::new());
    let (addr, handle) = setup_test_server(store).await;

    let response = reqwest::get(format!("http://{addr}/snap")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Snapshot Time: no snapshot yet"));
    assert!(body.contains("<th>Symbol</th>"));
    assert!(!body.contains("<td>"));

    handle.abort();
}

#[tokio::test]
async fn snap_ignores_request_parameters() {
    let store = Arc::new(SnapshotStore::new());
    store.publish(make_test_snapshot());
    let (addr, handle) = setup_test_server(Arc::clone(&store)).await;

    let plain = reqwest::get(format!("http://{addr}/snap"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let with_query = reqwest::get(format!("http://{addr}/snap?foo=bar&page=2"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(plain, with_query);

    handle.abort();
}

// =============================================================================
// Refresh Failure Scenarios
// =============================================================================

#[tokio::test]
async fn failed_refresh_keeps_serving_last_good_snapshot() {
    let store = Arc::new(SnapshotStore::new());
    store.publish(make_test_snapshot());
    let (addr, handle) = setup_test_server(Arc::clone(&store)).await;

    let cancel = CancellationToken::new();
    let scheduler = Arc::new(RefreshScheduler::new(
        Arc::new(FailingSource),
        Arc::clone(&store),
        Duration::from_millis(10),
        cancel.clone(),
    ));
    let scheduler_handle = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move { scheduler.run().await }
    });

    // Let several failing refresh attempts go by.
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    scheduler_handle.await.unwrap();

    assert!(scheduler.dispatched() >= 1);
    assert_eq!(store.sequence(), 1, "failed fetches must not publish");

    let body = reqwest::get(format!("http://{addr}/snap"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<td>ABC</td>"));

    handle.abort();
}

#[tokio::test]
async fn failed_refresh_with_empty_store_serves_empty_page_not_an_error() {
    let store = Arc::new(SnapshotStore::new());
    let (addr, handle) = setup_test_server(Arc::clone(&store)).await;

    let cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::new(
        Arc::new(FailingSource),
        Arc::clone(&store),
        Duration::from_millis(10),
        cancel.clone(),
    );
    let scheduler = Arc::new(scheduler);
    let scheduler_handle = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move { scheduler.run().await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    scheduler_handle.await.unwrap();

    let response = reqwest::get(format!("http://{addr}/snap")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Snapshot Time: no snapshot yet")
    );

    handle.abort();
}

#[tokio::test]
async fn scheduled_fetch_publishes_end_to_end() {
    let store = Arc::new(SnapshotStore::new());
    let (addr, handle) = setup_test_server(Arc::clone(&store)).await;

    let cancel = CancellationToken::new();
    let scheduler = Arc::new(RefreshScheduler::new(
        Arc::new(FixedSource(make_test_snapshot())),
        Arc::clone(&store),
        Duration::from_millis(10),
        cancel.clone(),
    ));
    let scheduler_handle = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move { scheduler.run().await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    scheduler_handle.await.unwrap();

    assert!(store.sequence() >= 1);

    let body = reqwest::get(format!("http://{addr}/snap"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<td>ABC</td>"));

    handle.abort();
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn health_is_unhealthy_before_first_publish() {
    let store = Arc::new(SnapshotStore::new());
    let (addr, handle) = setup_test_server(store).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload["status"], "unhealthy");
    assert_eq!(payload["snapshot"]["sequence"], 0);

    handle.abort();
}

#[tokio::test]
async fn health_is_healthy_after_a_fresh_publish() {
    let store = Arc::new(SnapshotStore::new());
    store.publish(make_test_snapshot());
    let (addr, handle) = setup_test_server(store).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["snapshot"]["sequence"], 1);
    assert_eq!(payload["snapshot"]["record_count"], 1);
    assert_eq!(payload["snapshot"]["captured_at"], "10:00");

    handle.abort();
}

#[tokio::test]
async fn healthz_answers_ok() {
    let store = Arc::new(SnapshotStore::new());
    let (addr, handle) = setup_test_server(store).await;

    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");

    handle.abort();
}
