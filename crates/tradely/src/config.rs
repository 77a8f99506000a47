//! Configuration for the Tradely client

use crate::error::{Result, TradelyError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend address used by the original web front-end
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable overriding [`TradelyConfig::api_base_url`]
pub const API_BASE_ENV: &str = "TRADELY_API_BASE";

/// Configuration for the Tradely client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradelyConfig {
    /// Base URL of the analysis backend
    pub api_base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Client-side pacing of backend requests
    pub requests_per_minute: u32,

    /// Number of headlines requested per ticker news fetch
    pub news_limit: usize,

    /// Delay between two consecutive revealed analysis units
    pub reveal_cadence: Duration,

    /// Articles shown per carousel page
    pub page_size: usize,

    /// Maximum number of articles kept per feed
    pub feed_capacity: usize,

    /// Freshness window for cached feeds
    pub feed_ttl: Duration,
}

impl Default for TradelyConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            requests_per_minute: 60,
            news_limit: 8,
            reveal_cadence: Duration::from_millis(600),
            page_size: 3,
            feed_capacity: 9,
            feed_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl TradelyConfig {
    /// Create a new configuration builder
    pub fn builder() -> TradelyConfigBuilder {
        TradelyConfigBuilder::default()
    }

    /// Load the backend address from the environment
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            self.api_base_url = base;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(TradelyError::ConfigError(
                "api_base_url must not be empty".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(TradelyError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.reveal_cadence.is_zero() {
            return Err(TradelyError::ConfigError(
                "reveal_cadence must be greater than 0".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(TradelyError::ConfigError(
                "page_size must be greater than 0".to_string(),
            ));
        }

        if self.feed_capacity < self.page_size {
            return Err(TradelyError::ConfigError(format!(
                "feed_capacity ({}) must hold at least one page of {} articles",
                self.feed_capacity, self.page_size
            )));
        }

        Ok(())
    }

    /// Feed TTL in epoch milliseconds, as stored next to cached feeds
    pub fn feed_ttl_ms(&self) -> i64 {
        i64::try_from(self.feed_ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Builder for TradelyConfig
#[derive(Debug, Default)]
pub struct TradelyConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    requests_per_minute: Option<u32>,
    news_limit: Option<usize>,
    reveal_cadence: Option<Duration>,
    page_size: Option<usize>,
    feed_capacity: Option<usize>,
    feed_ttl: Option<Duration>,
}

impl TradelyConfigBuilder {
    /// Set the backend base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set request pacing
    pub fn requests_per_minute(mut self, rate: u32) -> Self {
        self.requests_per_minute = Some(rate);
        self
    }

    /// Set the ticker news limit
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the reveal cadence
    pub fn reveal_cadence(mut self, cadence: Duration) -> Self {
        self.reveal_cadence = Some(cadence);
        self
    }

    /// Set the carousel page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the per-feed article cap
    pub fn feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = Some(capacity);
        self
    }

    /// Set the feed cache TTL
    pub fn feed_ttl(mut self, ttl: Duration) -> Self {
        self.feed_ttl = Some(ttl);
        self
    }

    /// Load the backend address from the environment
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            self.api_base_url = Some(base);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<TradelyConfig> {
        let defaults = TradelyConfig::default();

        let config = TradelyConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            reveal_cadence: self.reveal_cadence.unwrap_or(defaults.reveal_cadence),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            feed_capacity: self.feed_capacity.unwrap_or(defaults.feed_capacity),
            feed_ttl: self.feed_ttl.unwrap_or(defaults.feed_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
