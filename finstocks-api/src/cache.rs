//! Windowed read-through caches.
//!
//! Time is cut into fixed windows (`unix_secs / window_secs`). A cached value
//! is keyed by the window it was computed in plus the call arguments, so the
//! same arguments within one window reuse the value and the next window
//! recomputes it. Old windows are never looked up again and age out through
//! LRU eviction. There is no invalidation.

use lru::LruCache;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

/// Bounded LRU cache whose entries are only valid inside the window they
/// were stored in.
pub struct WindowedCache<K, V> {
    name: &'static str,
    window_secs: u64,
    clock: Arc<dyn Clock>,
    entries: Mutex<LruCache<(u64, K), V>>,
}

impl<K, V> WindowedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache. Zero capacity or window are raised to one.
    pub fn new(name: &'static str, capacity: usize, window_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            window_secs: window_secs.max(1),
            clock,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Index of the current window.
    pub fn epoch(&self) -> u64 {
        self.clock.now_secs() / self.window_secs
    }

    /// Return the value for `key` in the current window, computing and
    /// storing it on a miss. Errors are passed through and not stored.
    ///
    /// The lock is released while `fetch` runs, so two callers missing at the
    /// same time both compute; the later store wins.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = (self.epoch(), key);

        if let Some(value) = self.lookup(&slot) {
            tracing::debug!(cache = self.name, epoch = slot.0, "Cache hit");
            return Ok(value);
        }

        let value = fetch().await?;

        if let Ok(mut entries) = self.entries.lock() {
            entries.put(slot, value.clone());
        }
        Ok(value)
    }

    fn lookup(&self, slot: &(u64, K)) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(slot).cloned()
    }

    /// Number of stored entries, across all windows.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn cache_at(secs: u64, capacity: usize) -> (Arc<ManualClock>, WindowedCache<String, usize>) {
        let clock = Arc::new(ManualClock::new(secs));
        let cache = WindowedCache::new("test", capacity, 30, clock.clone());
        (clock, cache)
    }

    async fn counted(counter: &AtomicUsize) -> Result<usize, String> {
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test]
    async fn test_same_window_reuses_value() {
        let (clock, cache) = cache_at(60, 10);
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_try_fetch("k".into(), || counted(&calls)).await.unwrap();
        clock.advance(29);
        let second = cache.get_or_try_fetch("k".into(), || counted(&calls)).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_new_window_recomputes() {
        let (clock, cache) = cache_at(89, 10);
        let calls = AtomicUsize::new(0);

        cache.get_or_try_fetch("k".into(), || counted(&calls)).await.unwrap();
        clock.advance(1);
        let value = cache.get_or_try_fetch("k".into(), || counted(&calls)).await.unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_arguments_are_part_of_key() {
        let (_clock, cache) = cache_at(0, 10);
        let calls = AtomicUsize::new(0);

        cache.get_or_try_fetch("a".into(), || counted(&calls)).await.unwrap();
        cache.get_or_try_fetch("b".into(), || counted(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_stored() {
        let (_clock, cache) = cache_at(0, 10);

        let err = cache
            .get_or_try_fetch("k".into(), || async { Err::<usize, _>("boom".to_string()) })
            .await;
        assert_eq!(err, Err("boom".to_string()));
        assert!(cache.is_empty());

        let ok: Result<usize, String> = cache.get_or_try_fetch("k".into(), || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recent() {
        let (_clock, cache) = cache_at(0, 2);
        let calls = AtomicUsize::new(0);

        for key in ["a", "b", "c"] {
            cache.get_or_try_fetch(key.into(), || counted(&calls)).await.unwrap();
        }
        assert_eq!(cache.len(), 2);

        cache.get_or_try_fetch("a".into(), || counted(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_epoch_uses_window() {
        let (clock, cache) = cache_at(59, 1);
        assert_eq!(cache.epoch(), 1);
        clock.set(60);
        assert_eq!(cache.epoch(), 2);
    }
}
