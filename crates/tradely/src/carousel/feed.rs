//! Feed identities, articles, and the fetch collaborator

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which feed a carousel shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedIdentity {
    /// Market-wide live news
    Live,
    /// News scoped to one ticker
    Ticker(String),
}

impl FeedIdentity {
    /// Ticker-scoped identity; symbols are compared upper-cased
    pub fn ticker(symbol: impl AsRef<str>) -> Self {
        Self::Ticker(symbol.as_ref().trim().to_uppercase())
    }

    /// Prefix of the cache keys owned by this feed
    pub fn cache_prefix(&self) -> String {
        match self {
            Self::Live => "liveNews".to_string(),
            Self::Ticker(symbol) => format!("news_{symbol}"),
        }
    }

    /// Key holding the JSON-encoded article list
    pub fn data_key(&self) -> String {
        format!("{}Data", self.cache_prefix())
    }

    /// Key holding the fetch time in epoch milliseconds
    pub fn timestamp_key(&self) -> String {
        format!("{}Timestamp", self.cache_prefix())
    }
}

impl fmt::Display for FeedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Ticker(symbol) => f.write_str(symbol),
        }
    }
}

/// A news article shown in a carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
}

impl Article {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            url: url.into(),
            thumbnail_url: None,
            published_at: None,
            sentiment_label: None,
            sentiment_score: None,
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }
}

/// Fetches the articles of a feed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, identity: &FeedIdentity) -> Result<Vec<Article>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(FeedIdentity::Live.data_key(), "liveNewsData");
        assert_eq!(FeedIdentity::Live.timestamp_key(), "liveNewsTimestamp");

        let ticker = FeedIdentity::ticker(" aapl ");
        assert_eq!(ticker, FeedIdentity::Ticker("AAPL".to_string()));
        assert_eq!(ticker.data_key(), "news_AAPLData");
        assert_eq!(ticker.timestamp_key(), "news_AAPLTimestamp");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_article_json_shape() {
        let article = Article::new("Title", "Summary", "https://example.com/a")
            .with_thumbnail("https://example.com/a.png");
        let json = serde_json::to_value(&article).unwrap();

        assert_eq!(json["thumbnailUrl"], "https://example.com/a.png");
        assert!(json.get("publishedAt").is_none());

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }
}
