//! Configuration Module
//!
//! Configuration loading for the snapshot proxy service.

mod settings;

pub use settings::{ConfigError, FeedSettings, RefreshSettings, ServerSettings, ServiceConfig};
