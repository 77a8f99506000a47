//! Client core for the Tradely stock analysis service
//!
//! The backend produces a free-text analysis and news feeds for a ticker.
//! This crate provides what a front-end needs on top of that:
//!
//! - [`RevealEngine`]: discloses an analysis one sentence at a time on a fixed
//!   cadence and can be stopped or restarted at any point
//! - [`ExportPipeline`]: saves the full analysis as TXT, CSV, JSON, or PDF
//! - [`Carousel`]: pages through a news feed three articles at a time, backed
//!   by a TTL cache so remounts do not refetch
//! - [`BackendClient`]: typed access to the backend endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tradely::{BackendClient, Carousel, FeedIdentity, MemoryStore, RevealEngine, TradelyConfig};
//!
//! #[tokio::main]
//! async fn main() -> tradely::Result<()> {
//!     let config = TradelyConfig::default().with_env();
//!     let client = Arc::new(BackendClient::new(&config)?);
//!
//!     let analysis = client.fetch_analysis("AAPL").await?;
//!     let mut reveal = RevealEngine::from_config(&config)?;
//!     reveal.start_analysis(&analysis);
//!
//!     let store = Arc::new(MemoryStore::new());
//!     let mut news = Carousel::from_config(FeedIdentity::ticker("AAPL"), client, store, &config);
//!     news.mount().await;
//!     for article in news.current_page() {
//!         println!("{}", article.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod carousel;
pub mod config;
pub mod error;
pub mod export;
pub mod reveal;

// Re-export main types for convenience
pub use analysis::AnalysisResult;
pub use api::BackendClient;
pub use carousel::{
    Article, Carousel, CarouselState, FeedCache, FeedIdentity, FeedSource, KeyValueStore,
    MemoryStore,
};
pub use config::TradelyConfig;
pub use error::{Result, TradelyError};
pub use export::{DirectorySink, DownloadSink, ExportFormat, ExportPipeline};
pub use reveal::{RevealEngine, RevealedUnit};
