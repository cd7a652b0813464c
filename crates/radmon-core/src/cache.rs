//! Time-bound memoizing cache with a single expiry watermark and LRU capacity.
//!
//! [`TimedCache`] memoizes the results of a side-effecting computation (a remote
//! fetch followed by a parse) keyed by its arguments. Expiry is tracked once for
//! the whole cache rather than per key: the first insertion after a purge sets a
//! watermark at `now + lifetime`, and the first call that observes `now >= watermark`
//! clears every entry before doing anything else. All argument combinations therefore
//! expire together.
//!
//! Refresh is lazy. Nothing happens in the background; the next call after expiry
//! recomputes.
//!
//! ```rust
//! use radmon_core::cache::TimedCache;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let cache: TimedCache<String, u32> = TimedCache::new(Duration::from_secs(60), 8);
//! let first = cache.get_or_insert_with("a".into(), || async { 1 }).await;
//! let second = cache.get_or_insert_with("a".into(), || async { 2 }).await;
//! assert_eq!((first, second), (1, 1));
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Memoizing cache whose entries all expire at one shared watermark.
///
/// The internal state is guarded by an async mutex that stays locked while the
/// computation for a miss runs, so the expiry check, the computation and the store
/// form one atomic step with respect to other callers. Computations are expected to
/// carry their own time bound (the fetcher's request timeout).
pub struct TimedCache<K, V> {
    lifetime: Duration,
    max_entries: usize,
    state: Mutex<CacheState<K, V>>,
}

struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    watermark: Option<Instant>,
    tick: u64,
    stats: CacheStats,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    recorded_at: Instant,
    last_used: u64,
}

/// Counters describing cache behavior since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from a live entry.
    pub hits: u64,
    /// Calls that ran the computation.
    pub misses: u64,
    /// Entries dropped to respect `max_entries`.
    pub evictions: u64,
    /// Number of times the watermark passed and the cache was purged.
    pub expirations: u64,
}

impl<K, V> CacheState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Purge everything if the watermark has passed.
    fn expire(&mut self, now: Instant) {
        if self.watermark.is_some_and(|w| now >= w) {
            debug!(purged = self.entries.len(), "Cache watermark passed");
            self.entries.clear();
            self.watermark = None;
            self.stats.expirations += 1;
        }
    }

    fn lookup(&mut self, key: &K) -> Option<V> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(entry.value.clone())
    }

    fn store(&mut self, key: K, value: V, now: Instant, lifetime: Duration, max_entries: usize) {
        if self.watermark.is_none() {
            self.watermark = Some(now + lifetime);
        }

        self.tick += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                recorded_at: now,
                last_used: self.tick,
            },
        );

        while self.entries.len() > max_entries {
            let lru = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match lru {
                Some(key) => {
                    self.entries.remove(&key);
                    self.stats.evictions += 1;
                },
                None => break,
            }
        }
    }
}

impl<K, V> TimedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache whose entries live for `lifetime` and which holds at most
    /// `max_entries` keys. A capacity of zero is treated as one.
    pub fn new(lifetime: Duration, max_entries: usize) -> Self {
        Self {
            lifetime,
            max_entries: max_entries.max(1),
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                watermark: None,
                tick: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Configured lifetime of the watermark.
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Return the live value for `key`, or run `compute`, store and return its result.
    pub async fn get_or_insert_with<F, Fut>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let mut state = self.state.lock().await;
        state.expire(Instant::now());

        if let Some(value) = state.lookup(&key) {
            state.stats.hits += 1;
            debug!("Cache hit");
            return value;
        }

        state.stats.misses += 1;
        debug!("Cache miss");
        let value = compute().await;
        state.store(
            key,
            value.clone(),
            Instant::now(),
            self.lifetime,
            self.max_entries,
        );
        value
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but `Err` results are
    /// returned without being stored, so the next call tries again.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut state = self.state.lock().await;
        state.expire(Instant::now());

        if let Some(value) = state.lookup(&key) {
            state.stats.hits += 1;
            debug!("Cache hit");
            return Ok(value);
        }

        state.stats.misses += 1;
        debug!("Cache miss");
        let value = compute().await?;
        state.store(
            key,
            value.clone(),
            Instant::now(),
            self.lifetime,
            self.max_entries,
        );
        Ok(value)
    }

    /// Peek at a live value without computing anything.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock().await;
        state.expire(Instant::now());
        state.lookup(key)
    }

    /// Age of the live entry for `key`, if any.
    pub async fn age(&self, key: &K) -> Option<Duration> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        state.expire(now);
        state
            .entries
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.recorded_at))
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let mut state = self.state.lock().await;
        state.expire(Instant::now());
        state.entries.len()
    }

    /// Whether the cache currently holds no live entry.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry and reset the watermark.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.watermark = None;
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(calls: Arc<AtomicUsize>, value: u32) -> impl Future<Output = u32> {
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            value
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_call_within_lifetime_computes_once() {
        let cache = TimedCache::new(Duration::from_secs(600), 4);
        let calls = Arc::new(AtomicUsize::new(0));

        let a = cache
            .get_or_insert_with("feed", || counting(Arc::clone(&calls), 7))
            .await;
        tokio::time::advance(Duration::from_secs(599)).await;
        let b = cache
            .get_or_insert_with("feed", || counting(Arc::clone(&calls), 8))
            .await;

        assert_eq!(a, 7);
        assert_eq!(b, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_after_lifetime_recomputes() {
        let cache = TimedCache::new(Duration::from_secs(600), 4);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_insert_with("feed", || counting(Arc::clone(&calls), 1))
            .await;
        tokio::time::advance(Duration::from_secs(600)).await;
        let value = cache
            .get_or_insert_with("feed", || counting(Arc::clone(&calls), 2))
            .await;

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watermark_expires_all_keys_together() {
        let cache = TimedCache::new(Duration::from_secs(100), 4);

        cache.get_or_insert_with("early", || async { 1 }).await;
        tokio::time::advance(Duration::from_secs(90)).await;
        cache.get_or_insert_with("late", || async { 2 }).await;
        assert_eq!(cache.len().await, 2);

        // "late" is only 10s old, but the watermark set by "early" has passed.
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(cache.get(&"late").await.is_none());
        assert!(cache.is_empty().await);

        let refreshed = cache.get_or_insert_with("late", || async { 3 }).await;
        assert_eq!(refreshed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_watermark_starts_after_purge() {
        let cache = TimedCache::new(Duration::from_secs(100), 4);

        cache.get_or_insert_with("k", || async { 1 }).await;
        tokio::time::advance(Duration::from_secs(150)).await;
        cache.get_or_insert_with("k", || async { 2 }).await;
        tokio::time::advance(Duration::from_secs(99)).await;

        assert_eq!(cache.get(&"k").await, Some(2));
        assert_eq!(cache.age(&"k").await, Some(Duration::from_secs(99)));
    }

    #[tokio::test]
    async fn test_least_recently_used_entry_is_evicted() {
        let cache = TimedCache::new(Duration::from_secs(600), 2);

        cache.get_or_insert_with("a", || async { 1 }).await;
        cache.get_or_insert_with("b", || async { 2 }).await;
        // Touch "a" so "b" becomes least recently used.
        assert_eq!(cache.get(&"a").await, Some(1));
        cache.get_or_insert_with("c", || async { 3 }).await;

        assert_eq!(cache.get(&"a").await, Some(1));
        assert_eq!(cache.get(&"b").await, None);
        assert_eq!(cache.get(&"c").await, Some(3));
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TimedCache<&str, u32> = TimedCache::new(Duration::from_secs(600), 2);

        let failed: Result<u32, &str> = cache
            .get_or_try_insert_with("feed", || async { Err("offline") })
            .await;
        assert_eq!(failed, Err("offline"));
        assert!(cache.is_empty().await);

        let ok: Result<u32, &str> = cache
            .get_or_try_insert_with("feed", || async { Ok(5) })
            .await;
        assert_eq!(ok, Ok(5));

        let cached: Result<u32, &str> = cache
            .get_or_try_insert_with("feed", || async { Err("never called") })
            .await;
        assert_eq!(cached, Ok(5));
    }

    #[tokio::test]
    async fn test_zero_capacity_still_holds_one_entry() {
        let cache = TimedCache::new(Duration::from_secs(600), 0);
        cache.get_or_insert_with(1, || async { "one" }).await;
        assert_eq!(cache.len().await, 1);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_serialized() {
        let cache = Arc::new(TimedCache::new(Duration::from_secs(600), 2));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_insert_with("feed", || counting(Arc::clone(&calls), 42))
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
