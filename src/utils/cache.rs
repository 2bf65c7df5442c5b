//! Bounded in-memory key/value store with per-entry expiry.

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use lru::LruCache;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::trace;

/// Entries kept per cache unless configured otherwise
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Process-lifetime LRU cache. Time comes from the injected clock, so expiry
/// is deterministic under test; the least recently used entry is evicted once
/// `capacity` is reached.
pub struct TtlCache<K, V> {
    entries: RwLock<LruCache<K, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    /// A capacity of zero is treated as one.
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            clock,
            ttl,
        }
    }

    /// Returns the value if present and not expired; expired entries are dropped.
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        // LruCache::get bumps recency, so even reads take the write lock
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if now <= entry.expires_at => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        trace!("Cache entry expired: {:?}", key);
        entries.pop(key);
        None
    }

    pub async fn insert(&self, key: K, value: V) {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.entries.write().await;
        if let Some((evicted, _)) = entries.push(key, CacheEntry { value, expires_at }) {
            trace!("Cache entry replaced or evicted: {:?}", evicted);
        }
    }
}
