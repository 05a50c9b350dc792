//! Time-bounded memoization of nearby lookups.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Key/value cache with per-entry expiry.
pub trait ResultCache<V>: Send + Sync {
    /// Returns the value if present and not yet expired.
    fn get(&self, key: &str) -> Option<V>;

    fn set(&self, key: &str, value: V, ttl: Duration);
}

/// Source of "now" for expiry checks.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process [`ResultCache`] expiring entries by TTL only.
///
/// No size bound: keys are limited to the (postal code, radius) pairs
/// actually queried. Expired entries are purged when read.
pub struct TtlCache<V> {
    map: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Clock,
}

impl<V> TtlCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Instant::now))
    }

    /// Builds a cache reading time from `clock`; tests pass a manual clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until purged.
    #[must_use]
    pub fn len(&self) -> usize {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> ResultCache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = (self.clock)();
        {
            let entries = self.map.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.map.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock: a concurrent set may have refreshed it.
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = (self.clock)();
        let Some(expires_at) = now.checked_add(ttl) else {
            tracing::warn!(key, ?ttl, "cache ttl overflows the clock; entry not stored");
            return;
        };
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }
}
