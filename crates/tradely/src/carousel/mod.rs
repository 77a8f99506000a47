//! Cached, paginated news carousels
//!
//! A [`Carousel`] shows one feed three articles at a time. Feeds are cached
//! through a [`FeedCache`] so remounting within the TTL does not refetch.

mod cache;
mod feed;
mod store;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::TradelyConfig;
use crate::error::Result;

pub use cache::FeedCache;
pub use feed::{Article, FeedIdentity, FeedSource};
pub use store::{KeyValueStore, ManualClock, MemoryStore};

#[cfg(test)]
pub use feed::MockFeedSource;

/// Lifecycle of a carousel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselState {
    Uninitialized,
    Loading,
    Ready,
    /// The fetch succeeded but returned nothing
    Empty,
    /// The fetch failed; carries a user-presentable message
    Error(String),
}

impl CarouselState {
    /// Neutral text for states without articles to show
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Uninitialized | Self::Ready => None,
            Self::Loading => Some("Loading news..."),
            Self::Empty => Some("No news available"),
            Self::Error(message) => Some(message.as_str()),
        }
    }
}

/// Proof that a fetch was started for a given identity and mount.
///
/// [`Carousel::complete_load`] ignores tickets that no longer match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    identity: FeedIdentity,
    generation: u64,
}

impl LoadTicket {
    pub fn identity(&self) -> &FeedIdentity {
        &self.identity
    }
}

/// Paginated window over one cached feed
pub struct Carousel {
    identity: FeedIdentity,
    source: Arc<dyn FeedSource>,
    cache: FeedCache,
    page_size: usize,
    state: CarouselState,
    items: Vec<Article>,
    start_index: usize,
    generation: u64,
}

impl Carousel {
    pub fn new(
        identity: FeedIdentity,
        source: Arc<dyn FeedSource>,
        cache: FeedCache,
        page_size: usize,
    ) -> Self {
        Self {
            identity,
            source,
            cache,
            page_size: page_size.max(1),
            state: CarouselState::Uninitialized,
            items: Vec::new(),
            start_index: 0,
            generation: 0,
        }
    }

    pub fn from_config(
        identity: FeedIdentity,
        source: Arc<dyn FeedSource>,
        store: Arc<dyn KeyValueStore>,
        config: &TradelyConfig,
    ) -> Self {
        Self::new(
            identity,
            source,
            FeedCache::from_config(store, config),
            config.page_size,
        )
    }

    /// Load the feed from cache, fetching it when the cache is absent or stale
    pub async fn mount(&mut self) {
        if let Some(ticket) = self.begin_load() {
            let source = Arc::clone(&self.source);
            let result = source.fetch_feed(&ticket.identity).await;
            self.complete_load(ticket, result);
        }
    }

    /// Switch to another feed and mount it
    pub async fn mount_identity(&mut self, identity: FeedIdentity) {
        self.set_identity(identity);
        self.mount().await;
    }

    /// First half of a mount.
    ///
    /// A fresh cache entry moves straight to `Ready` and returns `None`.
    /// Otherwise the carousel enters `Loading` and the returned ticket must be
    /// passed to [`complete_load`](Self::complete_load) with the fetch result.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        self.generation = self.generation.wrapping_add(1);
        self.start_index = 0;

        if let Some(items) = self.cache.read_fresh(&self.identity) {
            self.apply_items(items);
            return None;
        }

        debug!(feed = %self.identity, "Fetching feed");
        self.items.clear();
        self.state = CarouselState::Loading;
        Some(LoadTicket {
            identity: self.identity.clone(),
            generation: self.generation,
        })
    }

    /// Second half of a mount. Returns `false` when the ticket was superseded
    /// by a later mount or identity change and the result was dropped.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Vec<Article>>) -> bool {
        if ticket.generation != self.generation || ticket.identity != self.identity {
            debug!(feed = %ticket.identity, "Ignoring superseded feed response");
            return false;
        }

        match result {
            Ok(items) if items.is_empty() => {
                self.items.clear();
                self.state = CarouselState::Empty;
                info!(feed = %self.identity, "Feed is empty");
            }
            Ok(items) => {
                // Cache write and the Ready transition happen together
                let items = self.cache.write(&self.identity, items);
                self.apply_items(items);
            }
            Err(e) => {
                warn!(feed = %self.identity, error = %e, "Feed fetch failed");
                self.items.clear();
                self.state = CarouselState::Error(format!("Unable to load news: {e}"));
            }
        }
        true
    }

    /// Point the carousel at another feed; it must be mounted again.
    /// In-flight responses for the old feed are ignored.
    pub fn set_identity(&mut self, identity: FeedIdentity) {
        if identity != self.identity {
            self.identity = identity;
            self.generation = self.generation.wrapping_add(1);
            self.items.clear();
            self.start_index = 0;
            self.state = CarouselState::Uninitialized;
        }
    }

    /// Advance one page, wrapping to the first page after the last
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if !self.is_navigable() {
            return;
        }
        let next = self.start_index + self.page_size;
        self.start_index = if next >= self.items.len() { 0 } else { next };
    }

    /// Go back one page, wrapping to the last page before the first
    pub fn prev(&mut self) {
        if !self.is_navigable() {
            return;
        }
        self.start_index = if self.start_index == 0 {
            self.last_page_start()
        } else {
            self.start_index - self.page_size
        };
    }

    /// Jump to a page, clamped to the pages available
    pub fn jump_to(&mut self, page: usize) {
        if !self.is_navigable() {
            return;
        }
        self.start_index = page.min(self.page_count() - 1) * self.page_size;
    }

    /// Articles on the current page; empty unless `Ready`
    pub fn current_page(&self) -> &[Article] {
        if self.state != CarouselState::Ready {
            return &[];
        }
        let end = (self.start_index + self.page_size).min(self.items.len());
        &self.items[self.start_index..end]
    }

    /// Number of pages, derived from the article count
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    pub fn current_page_index(&self) -> usize {
        self.start_index / self.page_size
    }

    /// One dot per page, `true` for the page on screen
    pub fn page_indicators(&self) -> Vec<bool> {
        let current = self.current_page_index();
        (0..self.page_count()).map(|page| page == current).collect()
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn identity(&self) -> &FeedIdentity {
        &self.identity
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn apply_items(&mut self, items: Vec<Article>) {
        self.items = items;
        self.start_index = 0;
        self.state = CarouselState::Ready;
        info!(feed = %self.identity, items = self.items.len(), "Feed ready");
    }

    fn is_navigable(&self) -> bool {
        self.state == CarouselState::Ready && !self.items.is_empty()
    }

    fn last_page_start(&self) -> usize {
        (self.page_count() - 1) * self.page_size
    }
}
