//! In-memory key/value store with per-entry expiration.
//!
//! * Cloning a [`TtlCache`] shares the underlying map; hand the same
//!   instance to every job that should see the same entries.
//! * Expired entries are dropped on read of their key, on every insert, or
//!   in bulk through [`TtlCache::purge_expired`].
//! * Each `get`/`insert` runs under one lock acquisition.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
    time::{Duration, Instant},
};

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Thread-safe cache with per-entry time-to-live.
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl<V> TtlCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|entry| entry.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).is_some_and(|entry| entry.is_live(now))
    }

    /// Store `value` under `key`, replacing any previous entry, and drop
    /// every entry that has expired.
    ///
    /// `ttl` of `None` keeps the entry for the lifetime of the cache.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now.checked_add(ttl));
        let entry = Entry {
            value,
            // A deadline past Instant's range never arrives.
            expires_at: expires_at.flatten(),
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.into(), entry);
    }

    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Clone of the live value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have refreshed the entry in between.
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn returns_value_before_expiry() {
        let cache = TtlCache::new();
        cache.insert("a", 1, Some(Duration::from_secs(60)));
        assert_eq!(cache.get("a"), Some(1));
        assert!(cache.contains_key("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let cache = TtlCache::new();
        cache.insert("a", 1, Some(Duration::from_millis(10)));
        sleep(Duration::from_millis(30));
        assert_eq!(cache.get("a"), None);
        assert!(!cache.contains_key("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_without_ttl_do_not_expire() {
        let cache = TtlCache::new();
        cache.insert("a", "x", None);
        sleep(Duration::from_millis(5));
        assert_eq!(cache.get("a"), Some("x"));
    }

    #[test]
    fn clones_share_entries() {
        let cache = TtlCache::new();
        let other = cache.clone();
        cache.insert("a", 1, None);
        assert_eq!(other.get("a"), Some(1));
    }

    #[test]
    fn insert_replaces_and_touches_only_its_key() {
        let cache = TtlCache::new();
        cache.insert("a", 1, None);
        cache.insert("b", 2, None);
        cache.insert("a", 3, None);
        assert_eq!(cache.get("a"), Some(3));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn purge_expired_removes_only_dead_entries() {
        let cache = TtlCache::new();
        cache.insert("short", 1, Some(Duration::from_millis(5)));
        cache.insert("long", 2, Some(Duration::from_secs(60)));
        sleep(Duration::from_millis(20));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[test]
    fn insert_drops_expired_entries_of_other_keys() {
        let cache = TtlCache::new();
        for i in 0..1000 {
            cache.insert(format!("stale-{i}"), i, Some(Duration::from_millis(1)));
        }
        cache.insert("kept", 0, None);
        sleep(Duration::from_millis(20));
        cache.insert("fresh", 1, Some(Duration::from_secs(60)));
        assert_eq!(cache.stored(), 2);
        assert_eq!(cache.get("kept"), Some(0));
        assert_eq!(cache.get("fresh"), Some(1));
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let cache = TtlCache::new();
        cache.insert("a", 1, Some(Duration::MAX));
        assert_eq!(cache.get("a"), Some(1));
    }
}
