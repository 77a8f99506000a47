//! Wire types for the Tradely backend

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carousel::Article;

/// Placeholder the backend uses for missing article fields
const MISSING: &str = "N/A";

/// `pubDate` format of backend news items, e.g. `20250408T155624`
const PUB_DATE_FORMAT: &str = "%Y%m%dT%H%M%S";

/// News item as served by `/news/{ticker}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub sentiment_label: Option<String>,
    /// Numeric score, or the `"N/A"` placeholder
    #[serde(default)]
    pub sentiment_score: Value,
}

impl From<NewsItem> for Article {
    fn from(item: NewsItem) -> Self {
        Article {
            title: item.title.unwrap_or_default(),
            summary: item.summary.unwrap_or_default(),
            url: item.url.unwrap_or_default(),
            thumbnail_url: present(item.thumbnail),
            published_at: item.pub_date.as_deref().and_then(parse_pub_date),
            sentiment_label: present(item.sentiment_label),
            sentiment_score: item.sentiment_score.as_f64(),
        }
    }
}

/// News envelopes: `{company, news}` for tickers, `{feed: {news}}` for live news
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NewsResponse {
    Ticker {
        #[serde(default)]
        company: Option<String>,
        news: Vec<NewsItem>,
    },
    Live {
        feed: NewsFeed,
    },
    Bare(Vec<NewsItem>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsFeed {
    pub news: Vec<NewsItem>,
}

impl NewsResponse {
    pub fn into_articles(self) -> Vec<Article> {
        let items = match self {
            Self::Ticker { news, .. } => news,
            Self::Live { feed } => feed.news,
            Self::Bare(news) => news,
        };
        items.into_iter().map(Article::from).collect()
    }
}

/// One row of `/historical/{ticker}`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Close")]
    pub close: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalResponse {
    pub rows: Vec<HistoricalRow>,
}

/// Chart point derived from a historical row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: String,
    pub value: f64,
}

impl From<HistoricalRow> for PricePoint {
    fn from(row: HistoricalRow) -> Self {
        Self {
            time: row.date,
            value: row.close,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != MISSING)
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, PUB_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_news_item_conversion() {
        let item: NewsItem = serde_json::from_value(json!({
            "article": 1,
            "title": "Nokia Inks 5-Year Deal",
            "summary": "Deal summary",
            "pubDate": "20250408T155448",
            "url": "https://www.benzinga.com/news/1",
            "thumbnail": "https://www.benzinga.com/image.png",
            "sentimentScore": 0.392333,
            "sentimentLabel": "Bullish"
        }))
        .unwrap();
        let article = Article::from(item);

        assert_eq!(article.title, "Nokia Inks 5-Year Deal");
        assert_eq!(article.thumbnail_url.as_deref(), Some("https://www.benzinga.com/image.png"));
        assert_eq!(article.sentiment_label.as_deref(), Some("Bullish"));
        assert_eq!(article.sentiment_score, Some(0.392333));

        let published = article.published_at.unwrap();
        assert_eq!((published.year(), published.month(), published.day()), (2025, 4, 8));
        assert_eq!((published.hour(), published.minute()), (15, 54));
    }

    #[test]
    fn test_placeholders_become_none() {
        let item: NewsItem = serde_json::from_value(json!({
            "title": "N/A",
            "thumbnail": "N/A",
            "pubDate": "N/A",
            "sentimentScore": "N/A",
            "sentimentLabel": "N/A"
        }))
        .unwrap();
        let article = Article::from(item);

        assert_eq!(article.title, "N/A");
        assert_eq!(article.thumbnail_url, None);
        assert_eq!(article.published_at, None);
        assert_eq!(article.sentiment_score, None);
        assert_eq!(article.sentiment_label, None);
    }

    #[test]
    fn test_news_envelopes() {
        let ticker: NewsResponse = serde_json::from_value(json!({
            "company": "AAPL",
            "news": [{"title": "a"}, {"title": "b"}]
        }))
        .unwrap();
        assert_eq!(ticker.into_articles().len(), 2);

        let live: NewsResponse = serde_json::from_value(json!({
            "feed": {"news": [{"title": "live"}]}
        }))
        .unwrap();
        assert_eq!(live.into_articles()[0].title, "live");

        let bare: NewsResponse = serde_json::from_value(json!([])).unwrap();
        assert!(bare.into_articles().is_empty());
    }

    #[test]
    fn test_historical_rows() {
        let response: HistoricalResponse = serde_json::from_value(json!({
            "rows": [{"Date": "2024-01-02", "Close": 185.64, "Open": 187.15}]
        }))
        .unwrap();
        let points: Vec<PricePoint> = response.rows.into_iter().map(PricePoint::from).collect();
        assert_eq!(points, [PricePoint { time: "2024-01-02".to_string(), value: 185.64 }]);
    }
}
