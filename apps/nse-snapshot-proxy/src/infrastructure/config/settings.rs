//! Service Configuration Settings
//!
//! Configuration types for the snapshot proxy, loaded from environment
//! variables. Every value has a default taken from the feed's published
//! constants, so the service starts with no environment at all.

use std::time::Duration;

/// Default feed endpoint (NSE nifty gainers).
const DEFAULT_FEED_URL: &str =
    "https://www.nseindia.com/live_market/dynaContent/live_analysis/gainers/niftyGainers1.json";

/// Default `User-Agent` header sent with feed requests.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:47.0) Gecko/20100101 Firefox/47.0";

/// Default `Accept` header sent with feed requests.
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default interval between snapshot fetches.
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Default per-request timeout for feed fetches.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default HTTP listen port.
const DEFAULT_HTTP_PORT: u16 = 5000;

/// Outbound feed settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Feed endpoint URL.
    pub url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Accept` header value.
    pub accept: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Refresh scheduling settings.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Interval between snapshot fetches.
    pub interval: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Port the snapshot server listens on.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Outbound feed settings.
    pub feed: FeedSettings,
    /// Refresh scheduling settings.
    pub refresh: RefreshSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an empty value where one
    /// is required (the feed URL).
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = parse_env_string("SNAPSHOT_FEED_URL", DEFAULT_FEED_URL);
        if url.is_empty() {
            return Err(ConfigError::EmptyValue("SNAPSHOT_FEED_URL".to_string()));
        }

        let feed = FeedSettings {
            url,
            user_agent: parse_env_string("SNAPSHOT_FEED_USER_AGENT", DEFAULT_USER_AGENT),
            accept: parse_env_string("SNAPSHOT_FEED_ACCEPT", DEFAULT_ACCEPT),
            request_timeout: parse_env_duration_secs(
                "SNAPSHOT_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT,
            ),
        };

        let refresh = RefreshSettings {
            interval: parse_env_duration_secs(
                "SNAPSHOT_REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL,
            ),
        };

        let server = ServerSettings {
            http_port: parse_env_u16("SNAPSHOT_HTTP_PORT", DEFAULT_HTTP_PORT),
        };

        Ok(Self {
            feed,
            refresh,
            server,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has an empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
