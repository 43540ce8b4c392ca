// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key/value cache with a per-entry TTL and a fixed capacity.
//!
//! Expiry is enforced lazily: an expired entry is removed by the `get` that
//! observes it. When the map is full, `set` evicts the entry with the oldest
//! last access before inserting. Lookups only take the read lock; recency is
//! tracked with an atomic so concurrent hits do not serialize.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Instant,
    /// Nanoseconds since the cache epoch.
    last_access: AtomicU64,
    /// Insertion order, breaks `last_access` ties.
    seq: u64,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    next_seq: u64,
}

/// A TTL + LRU-approximating cache keyed by string fingerprints.
pub struct CacheManager<V> {
    inner: RwLock<Inner<V>>,
    ttl: Duration,
    max_size: usize,
    enabled: bool,
    epoch: Instant,
}

impl<V: Clone> CacheManager<V> {
    /// Create a cache. A disabled cache misses every lookup and stores nothing.
    pub fn new(enabled: bool, ttl: Duration, max_size: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
            }),
            ttl,
            max_size,
            enabled,
            epoch: Instant::now(),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            let entry = inner.entries.get(key)?;
            if now <= entry.expires_at {
                entry.last_access.store(self.ticks(now), Ordering::Relaxed);
                debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
        }

        // Expired. Another writer may have replaced it since the read lock
        // was released, so re-check before removing.
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let still_expired = inner
            .entries
            .get(key)
            .is_some_and(|entry| now > entry.expires_at);
        if still_expired {
            inner.entries.remove(key);
            debug!(key, "cache entry expired");
        }
        None
    }

    /// Insert or replace `key`.
    ///
    /// When the cache is full and `key` is new, exactly one entry (the least
    /// recently accessed) is evicted first.
    pub fn set(&self, key: impl Into<String>, value: V) {
        if !self.enabled || self.max_size == 0 {
            return;
        }

        let key = key.into();
        let now = Instant::now();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_size {
            let victim = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| (e.last_access.load(Ordering::Relaxed), e.seq))
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                inner.entries.remove(&victim);
                debug!(key = %victim, "cache evicted least recently used entry");
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        let entry = Entry {
            value,
            expires_at: now + self.ttl,
            last_access: AtomicU64::new(self.ticks(now)),
            seq,
        };
        inner.entries.insert(key, entry);
    }

    /// Number of stored entries, expired ones included until observed.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clear();
    }

    fn ticks(&self, now: Instant) -> u64 {
        u64::try_from(now.duration_since(self.epoch).as_nanos()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_size: usize) -> CacheManager<u32> {
        CacheManager::new(true, Duration::from_secs(60), max_size)
    }

    #[tokio::test(start_paused = true)]
    async fn hit_and_miss() {
        let c = cache(4);
        assert_eq!(c.get("a"), None);
        c.set("a", 1);
        assert_eq!(c.get("a"), Some(1));
        assert_eq!(c.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_removed_on_get() {
        let c = cache(4);
        c.set("a", 1);
        tokio::time::advance(Duration::from_secs(60)).await;
        // Exactly at expiry still counts as live.
        assert_eq!(c.get("a"), Some(1));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(c.get("a"), None);
        assert!(c.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_least_recently_accessed() {
        let c = cache(3);
        c.set("a", 1);
        tokio::time::advance(Duration::from_millis(1)).await;
        c.set("b", 2);
        tokio::time::advance(Duration::from_millis(1)).await;
        c.set("c", 3);
        tokio::time::advance(Duration::from_millis(1)).await;

        // Touch "a" so "b" becomes the oldest.
        assert_eq!(c.get("a"), Some(1));
        tokio::time::advance(Duration::from_millis(1)).await;

        c.set("d", 4);
        assert_eq!(c.len(), 3);
        assert_eq!(c.get("b"), None);
        assert_eq!(c.get("a"), Some(1));
        assert_eq!(c.get("c"), Some(3));
        assert_eq!(c.get("d"), Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn victim_is_chosen_by_recency_not_expiry() {
        let c = cache(2);
        c.set("a", 1);
        tokio::time::advance(Duration::from_secs(30)).await;
        c.set("b", 2);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(c.get("a"), Some(1));

        // "a" is now expired but was touched after "b" was written.
        tokio::time::advance(Duration::from_secs(30)).await;
        c.set("c", 3);

        assert_eq!(c.len(), 2);
        assert_eq!(c.get("b"), None);
        assert_eq!(c.get("a"), None);
        assert_eq!(c.get("c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn ties_evict_oldest_insertion() {
        let c = cache(2);
        c.set("a", 1);
        c.set("b", 2);
        c.set("c", 3);
        assert_eq!(c.get("a"), None);
        assert_eq!(c.get("b"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_key_never_evicts() {
        let c = cache(2);
        c.set("a", 1);
        c.set("b", 2);
        c.set("a", 10);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a"), Some(10));
        assert_eq!(c.get("b"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_key_resets_ttl() {
        let c = cache(2);
        c.set("a", 1);
        tokio::time::advance(Duration::from_secs(50)).await;
        c.set("a", 2);
        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(c.get("a"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_cache_never_stores() {
        let c: CacheManager<u32> = CacheManager::disabled();
        c.set("a", 1);
        assert_eq!(c.get("a"), None);
        assert!(c.is_empty());
        assert!(!c.is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_capacity_is_a_noop() {
        let c = cache(0);
        c.set("a", 1);
        assert!(c.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties() {
        let c = cache(2);
        c.set("a", 1);
        c.clear();
        assert_eq!(c.get("a"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_access_respects_capacity() {
        let c = std::sync::Arc::new(CacheManager::new(true, Duration::from_secs(60), 16));
        let mut handles = Vec::new();
        for t in 0..8u32 {
            let c = c.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200u32 {
                    let key = format!("k{}", (t * 7 + i) % 40);
                    c.set(key.clone(), i);
                    let _ = c.get(&key);
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(c.len() <= 16);
    }

    proptest::proptest! {
        #[test]
        fn size_never_exceeds_capacity(
            cap in 1usize..8,
            keys in proptest::collection::vec(0u8..20, 0..64),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            rt.block_on(async {
                let c = CacheManager::new(true, Duration::from_secs(60), cap);
                for k in &keys {
                    c.set(k.to_string(), *k);
                    proptest::prop_assert!(c.len() <= cap);
                }
                Ok(())
            })?;
        }
    }
}
