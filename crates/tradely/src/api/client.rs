//! HTTP client for the Tradely backend

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::types::{HistoricalResponse, NewsResponse, PricePoint};
use crate::analysis::AnalysisResult;
use crate::carousel::{Article, FeedIdentity, FeedSource};
use crate::config::TradelyConfig;
use crate::error::{Result, TradelyError};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Period requested for price history unless told otherwise
pub const DEFAULT_PERIOD: &str = "1mo";

/// Client for the analysis backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
    news_limit: usize,
    rate_limiter: SharedRateLimiter,
}

impl BackendClient {
    /// Create a client from configuration
    pub fn new(config: &TradelyConfig) -> Result<Self> {
        config.validate()?;

        let mut base = Url::parse(&config.api_base_url)?;
        if base.cannot_be_a_base() {
            return Err(TradelyError::ConfigError(format!(
                "api_base_url is not a base URL: {}",
                config.api_base_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(config.request_timeout).build()?;
        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            base,
            news_limit: config.news_limit,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Run the full analysis for a ticker (`GET /analyze_all?ticker=`)
    pub async fn fetch_analysis(&self, ticker: &str) -> Result<AnalysisResult> {
        let ticker = normalize_ticker(ticker)?;
        let mut url = self.endpoint(&["analyze_all"])?;
        url.query_pairs_mut().append_pair("ticker", &ticker);

        let payload: Value = self.get_json(url).await?;
        Ok(AnalysisResult::from_value(payload))
    }

    /// Latest headlines for a ticker (`GET /news/{ticker}?limit=`)
    pub async fn fetch_news(&self, ticker: &str, limit: usize) -> Result<Vec<Article>> {
        let ticker = normalize_ticker(ticker)?;
        let mut url = self.endpoint(&["news", &ticker])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());

        let response: NewsResponse = self.get_json(url).await?;
        Ok(response.into_articles())
    }

    /// Market-wide live headlines (`GET /live_news`)
    pub async fn fetch_live_news(&self) -> Result<Vec<Article>> {
        let url = self.endpoint(&["live_news"])?;
        let response: NewsResponse = self.get_json(url).await?;
        Ok(response.into_articles())
    }

    /// Closing prices for charting (`GET /historical/{ticker}?period=`)
    pub async fn fetch_historical(&self, ticker: &str, period: &str) -> Result<Vec<PricePoint>> {
        let ticker = normalize_ticker(ticker)?;
        let mut url = self.endpoint(&["historical", &ticker])?;
        url.query_pairs_mut().append_pair("period", period);

        let response: HistoricalResponse = self.get_json(url).await?;
        Ok(response.rows.into_iter().map(PricePoint::from).collect())
    }

    /// Company metadata, passed through as JSON (`GET /metadata/{ticker}`)
    pub async fn fetch_metadata(&self, ticker: &str) -> Result<Value> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.endpoint(&["metadata", &ticker])?;
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| TradelyError::ConfigError(format!("Invalid base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.rate_limiter.until_ready().await;
        debug!(%url, "Backend request");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TradelyError::ApiError(format!(
                "Backend error {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TradelyError::ApiError(format!("Failed to parse backend response: {e}")))
    }
}

#[async_trait]
impl FeedSource for BackendClient {
    async fn fetch_feed(&self, identity: &FeedIdentity) -> Result<Vec<Article>> {
        match identity {
            FeedIdentity::Live => self.fetch_live_news().await,
            FeedIdentity::Ticker(symbol) => self.fetch_news(symbol, self.news_limit).await,
        }
    }
}

/// Trim and upper-case a ticker, rejecting anything that is not a symbol
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= 16
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(ticker)
    } else {
        Err(TradelyError::InvalidSymbol(ticker))
    }
}
