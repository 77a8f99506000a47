//! Time-bounded feed cache on top of a [`KeyValueStore`]

use std::sync::Arc;

use tracing::{debug, warn};

use super::feed::{Article, FeedIdentity};
use super::store::KeyValueStore;
use crate::config::TradelyConfig;

/// Capped, TTL-bound article lists keyed by feed identity.
///
/// Each feed owns two keys: `<prefix>Data` with the JSON article list and
/// `<prefix>Timestamp` with the fetch time in epoch milliseconds. Clones
/// share the same store.
#[derive(Clone)]
pub struct FeedCache {
    store: Arc<dyn KeyValueStore>,
    ttl_ms: i64,
    capacity: usize,
}

impl FeedCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_ms: i64, capacity: usize) -> Self {
        Self {
            store,
            ttl_ms,
            capacity,
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &TradelyConfig) -> Self {
        Self::new(store, config.feed_ttl_ms(), config.feed_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached articles if the entry exists, parses, holds at least one
    /// article, and is younger than the TTL
    pub fn read_fresh(&self, identity: &FeedIdentity) -> Option<Vec<Article>> {
        let fetched_at = self.fetched_at(identity)?;
        let age = self.store.now_ms().saturating_sub(fetched_at);
        if age >= self.ttl_ms {
            debug!(feed = %identity, age_ms = age, "Cache stale");
            return None;
        }

        let raw = self.store.get(&identity.data_key())?;
        match serde_json::from_str::<Vec<Article>>(&raw) {
            Ok(items) if items.is_empty() => {
                debug!(feed = %identity, "Cached feed is empty, treating as miss");
                None
            }
            Ok(mut items) => {
                items.truncate(self.capacity);
                debug!(feed = %identity, items = items.len(), "Cache hit");
                Some(items)
            }
            Err(e) => {
                warn!(feed = %identity, error = %e, "Discarding corrupt cache entry");
                None
            }
        }
    }

    /// Store the first `capacity` items with the current time; returns what was stored
    pub fn write(&self, identity: &FeedIdentity, mut items: Vec<Article>) -> Vec<Article> {
        items.truncate(self.capacity);
        match serde_json::to_string(&items) {
            Ok(json) => {
                self.store.set(&identity.data_key(), json);
                self.store
                    .set(&identity.timestamp_key(), self.store.now_ms().to_string());
                debug!(feed = %identity, items = items.len(), "Cache write");
            }
            Err(e) => warn!(feed = %identity, error = %e, "Failed to encode feed for cache"),
        }
        items
    }

    fn fetched_at(&self, identity: &FeedIdentity) -> Option<i64> {
        let raw = self.store.get(&identity.timestamp_key())?;
        match raw.trim().parse() {
            Ok(ms) => Some(ms),
            Err(_) => {
                warn!(feed = %identity, value = %raw, "Discarding corrupt cache timestamp");
                None
            }
        }
    }
}
