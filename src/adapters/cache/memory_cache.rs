use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::ports::cache::ResponseCache;

const FALLBACK_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

struct Entry {
    body: String,
    expires_at: Instant,
}

impl Entry {
    fn is_fresh(&self) -> bool {
        Instant::now() <= self.expires_at
    }
}

/// In-process LRU of API response bodies with per-entry TTL.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or_else(|| {
            tracing::warn!(
                "Cache max_entries was 0, defaulting to {}",
                FALLBACK_CAPACITY
            );
            FALLBACK_CAPACITY
        });
        Self {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::error!(key, "Cache lock poisoned on get, treating as miss");
            return None;
        };
        if entries.get(key).is_some_and(Entry::is_fresh) {
            return entries.get(key).map(|e| e.body.clone());
        }
        entries.pop(key);
        None
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::error!(key, "Cache lock poisoned on set, skipping write");
            return;
        };
        entries.put(
            key.to_string(),
            Entry {
                body: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
