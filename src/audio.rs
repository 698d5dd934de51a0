//! Signed audio URL cache
//!
//! The backend hands out short-lived signed URLs for audio files. Reusing a URL
//! until shortly before it expires saves a round trip per playback.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct CacheEntry {
    url: String,
    fetched_at: DateTime<Utc>,
}

/// Audio filename -> signed URL, valid for a fixed time
#[derive(Debug, Clone)]
pub struct AudioUrlCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl AudioUrlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cache with a TTL in seconds; `None` if negative or out of range
    pub fn with_ttl_secs(secs: i64) -> Option<Self> {
        if secs < 0 {
            return None;
        }
        Duration::try_seconds(secs).map(Self::new)
    }

    /// Cached URL if it is still younger than the TTL
    pub fn get(&self, filename: &str, now: DateTime<Utc>) -> Option<&str> {
        self.entries
            .get(filename)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.url.as_str())
    }

    pub fn insert(&mut self, filename: impl Into<String>, url: impl Into<String>, now: DateTime<Utc>) {
        self.entries.insert(
            filename.into(),
            CacheEntry {
                url: url.into(),
                fetched_at: now,
            },
        );
    }

    pub fn remove(&mut self, filename: &str) {
        self.entries.remove(filename);
    }

    /// Drop stale entries, returning how many were removed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AudioUrlCache {
    fn default() -> Self {
        Self::new(Duration::seconds(55))
    }
}
