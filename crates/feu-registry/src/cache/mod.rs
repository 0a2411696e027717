//! Response caching with TTL support

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, SystemTime};

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache entry with TTL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Decoded response body
    pub body: Value,
    /// When the entry was stored
    pub stored_at: SystemTime,
    /// Time-to-live duration
    pub ttl: Duration,
}

impl CacheEntry {
    /// Create new cache entry with default TTL (1 hour)
    pub fn new(body: Value) -> Self {
        Self::with_ttl(body, DEFAULT_TTL)
    }

    /// Create cache entry with custom TTL
    pub fn with_ttl(body: Value, ttl: Duration) -> Self {
        Self {
            body,
            stored_at: SystemTime::now(),
            ttl,
        }
    }

    /// Check if cache entry is still fresh
    pub fn is_fresh(&self) -> bool {
        match self.stored_at.elapsed() {
            Ok(elapsed) => elapsed < self.ttl,
            Err(_) => false, // Clock went backwards, consider stale
        }
    }

    pub fn age(&self) -> Option<Duration> {
        self.stored_at.elapsed().ok()
    }
}

/// In-memory response cache keyed by request URL
#[derive(Debug, Default)]
pub struct MetadataCache {
    cache: DashMap<String, CacheEntry>,
    ttl: Option<Duration>,
}

impl MetadataCache {
    /// Create new cache using the default TTL
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries live for `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// Get a cached body if fresh; stale entries are evicted
    pub fn get(&self, url: &str) -> Option<Value> {
        let fresh = self.cache.get(url).map(|entry| entry.is_fresh())?;
        if fresh {
            self.cache.get(url).map(|entry| entry.body.clone())
        } else {
            self.cache.remove(url);
            None
        }
    }

    pub fn insert(&self, url: String, body: Value) {
        let entry = CacheEntry::with_ttl(body, self.ttl.unwrap_or(DEFAULT_TTL));
        self.cache.insert(url, entry);
    }

    pub fn insert_with_ttl(&self, url: String, body: Value, ttl: Duration) {
        self.cache.insert(url, CacheEntry::with_ttl(body, ttl));
    }

    pub fn contains_fresh(&self, url: &str) -> bool {
        self.cache.get(url).map(|entry| entry.is_fresh()).unwrap_or(false)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let fresh_entries = self.cache.iter().filter(|entry| entry.is_fresh()).count();
        let total_entries = self.cache.len();

        CacheStats {
            total_entries,
            fresh_entries,
            stale_entries: total_entries.saturating_sub(fresh_entries),
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Remove stale entries, returning how many were dropped
    pub fn cleanup(&self) -> usize {
        let before = self.cache.len();
        self.cache.retain(|_, entry| entry.is_fresh());
        before.saturating_sub(self.cache.len())
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
}
