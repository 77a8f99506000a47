//! Key-value storage backing feed caches

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// String key-value store with a clock, in the shape of browser local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    /// Current time in epoch milliseconds
    fn now_ms(&self) -> i64;
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now_ms.fetch_add(by, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum Clock {
    System,
    Manual(ManualClock),
}

/// Process-wide in-memory store
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    clock: Clock,
}

impl MemoryStore {
    /// Store using wall-clock time
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock: Clock::System,
        }
    }

    /// Store whose time is driven by `clock`
    pub fn with_clock(clock: ManualClock) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock: Clock::Manual(clock),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value);
        }
    }

    fn now_ms(&self) -> i64 {
        match &self.clock {
            Clock::System => chrono::Utc::now().timestamp_millis(),
            Clock::Manual(clock) => clock.now_ms(),
        }
    }
}
