use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use catalogdb_core::config::DEFAULT_CACHE_TTL_MS;
use catalogdb_core::traits::{SystemTimeSource, TimeSource};

pub const DEFAULT_TTL_MS: u64 = DEFAULT_CACHE_TTL_MS;

/// A stored value and the time it was written. Values are shared read-only.
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub value: Arc<V>,
    pub inserted_at: DateTime<Utc>,
}

/// Key/value store whose entries expire `ttl` after insertion.
///
/// Expiry is lazy; there is no background sweeper. All state sits behind a
/// single mutex so one instance may be shared between threads.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    time_source: Arc<dyn TimeSource>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration) -> Self { Self::with_time_source(ttl, Arc::new(SystemTimeSource)) }

    pub fn with_ttl_ms(ttl_ms: u64) -> Self { Self::new(Duration::from_millis(ttl_ms)) }

    pub fn with_time_source(ttl: Duration, time_source: Arc<dyn TimeSource>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl, time_source }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn get(&self, key: &K) -> Option<Arc<V>> { self.get_if(key, |_| true) }

    /// Like `get`, but an entry rejected by `is_valid` is evicted and reported
    /// as a miss.
    pub fn get_if(&self, key: &K, is_valid: impl FnOnce(&V) -> bool) -> Option<Arc<V>> {
        let now = self.time_source.now();
        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;
        if self.is_expired(entry, now) {
            debug!("cache entry expired");
            entries.remove(key);
            return None;
        }
        if !is_valid(entry.value.as_ref()) {
            entries.remove(key);
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Inserts or replaces; replacing resets the entry's age.
    pub fn put(&self, key: K, value: V) {
        let entry = CacheEntry { value: Arc::new(value), inserted_at: self.time_source.now() };
        self.entries.lock().insert(key, entry);
    }

    pub fn remove(&self, key: &K) -> bool { self.entries.lock().remove(key).is_some() }

    pub fn clear(&self) { self.entries.lock().clear(); }

    /// Number of stored entries, stale ones included until they are touched.
    pub fn len(&self) -> usize { self.entries.lock().len() }

    pub fn is_empty(&self) -> bool { self.entries.lock().is_empty() }

    /// Drops every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.time_source.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(e, now));
        before - entries.len()
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        // a clock that moved backwards yields a negative age; treat it as fresh
        let age = (now - entry.inserted_at).to_std().unwrap_or_default();
        age > self.ttl
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self { Self::with_ttl_ms(DEFAULT_TTL_MS) }
}
