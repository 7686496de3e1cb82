use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// A small time-to-live cache with an explicit clock.
///
/// Every operation takes `now`, so callers (and tests) decide what time
/// it is. An entry stored at `t` is fresh while `now - t < ttl`.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Hours beyond what `Duration` can represent saturate to `Duration::MAX`.
    pub fn with_ttl_hours(hours: i64) -> Self {
        Self::new(Duration::try_hours(hours).unwrap_or(Duration::MAX))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;
        if Self::entry_expired(entry, self.ttl, now) {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Store `value`, stamped with `now`. Replaces any previous entry.
    pub fn set(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// True if `key` is missing or its entry is older than the TTL.
    pub fn is_expired(&self, key: &K, now: DateTime<Utc>) -> bool {
        self.entries
            .get(key)
            .map_or(true, |entry| Self::entry_expired(entry, self.ttl, now))
    }

    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !Self::entry_expired(entry, ttl, now));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_expired(entry: &CacheEntry<V>, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - entry.stored_at >= ttl
    }
}
