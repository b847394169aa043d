//! NSE Feed Client
//!
//! Outbound HTTP adapter implementing the [`SnapshotSource`] port: one
//! GET against the configured feed endpoint, decoded from the wire JSON
//! into a domain [`Snapshot`]. Stateless per call - publishing the result
//! is left to the caller so the store write stays a single atomic step.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header;
use serde::Deserialize;

use crate::application::ports::{FetchError, SnapshotSource};
use crate::domain::snapshot::{MarketRecord, Snapshot};
use crate::infrastructure::config::FeedSettings;

// =============================================================================
// Wire Types
// =============================================================================

/// Wire shape of the feed payload.
#[derive(Debug, Deserialize)]
struct FeedPayload {
    #[serde(default)]
    time: String,
    #[serde(default)]
    data: Vec<FeedRecord>,
}

/// Wire shape of one feed row.
///
/// Missing fields decode as empty strings; unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FeedRecord {
    symbol: String,
    series: String,
    open_price: String,
    high_price: String,
    low_price: String,
    ltp: String,
    previous_price: String,
    net_price: String,
    traded_quantity: String,
    turnover_in_lakhs: String,
    last_corp_announcement_date: String,
    last_corp_announcement: String,
}

impl From<FeedRecord> for MarketRecord {
    fn from(record: FeedRecord) -> Self {
        Self {
            symbol: record.symbol,
            series: record.series,
            open_price: record.open_price,
            high_price: record.high_price,
            low_price: record.low_price,
            ltp: record.ltp,
            previous_price: record.previous_price,
            net_price: record.net_price,
            traded_quantity: record.traded_quantity,
            turnover_in_lakhs: record.turnover_in_lakhs,
            last_corp_announcement_date: record.last_corp_announcement_date,
            last_corp_announcement: record.last_corp_announcement,
        }
    }
}

impl From<FeedPayload> for Snapshot {
    fn from(payload: FeedPayload) -> Self {
        Self {
            captured_at: payload.time,
            records: payload.data.into_iter().map(MarketRecord::from).collect(),
        }
    }
}

// =============================================================================
// Feed Client
// =============================================================================

/// HTTP client for the NSE snapshot feed.
#[derive(Debug, Clone)]
pub struct NseFeedClient {
    client: Client,
    settings: FeedSettings,
}

impl NseFeedClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(settings: FeedSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, settings })
    }
}

#[async_trait]
impl SnapshotSource for NseFeedClient {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let response = self
            .client
            .get(&self.settings.url)
            .header(header::USER_AGENT, self.settings.user_agent.as_str())
            .header(header::ACCEPT, self.settings.accept.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        decode_payload(&body)
    }
}

/// Decode a raw feed body into a snapshot.
fn decode_payload(body: &str) -> Result<Snapshot, FetchError> {
    let payload: FeedPayload =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(payload.into())
}

// =============================================================================
// Tests
// =============================================================================
