use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::event::{self, CacheClearedData, CacheEvent, ItemAccessData, ItemWriteData};
use crate::sweeper::Sweeper;
use crate::{
    CacheConfig, CacheItem, CacheStats, CacheStore, CacheStrategy, ConfigError, FetchError,
    FetchStrategy, FifoStrategy,
};

/// Source of generated instance names (`cache-1`, `cache-2`, ...).
static NEXT_CACHE_ID: AtomicU64 = AtomicU64::new(1);

/// State behind the container lock: the store, the active strategy, and the
/// disposal latch. Everything that mutates the store goes through this one
/// mutex, which is what makes the background sweep safe against foreground
/// operations.
struct CacheInner<V> {
    store: CacheStore<V>,
    strategy: Box<dyn CacheStrategy<V>>,
    disposed: bool,
}

/// State shared with the sweeper thread.
struct Shared<V> {
    inner: Mutex<CacheInner<V>>,
    stats: CacheStats,
    name: String,
    debug_trace: bool,
}

/// The cache container.
///
/// Owns the backing store, enforces capacity by delegating eviction to the
/// active [`CacheStrategy`], enforces TTL both lazily on read and through a
/// recurring background sweep, emits lifecycle events to the strategy's
/// hooks, and optionally merges in fetch-on-miss behavior against a
/// [`FetchStrategy`].
///
/// # Contract highlights
///
/// * `read` never fails: absent, expired, and post-disposal reads all
///   return `None`.
/// * A write at capacity evicts exactly one item first; the capacity check
///   precedes the upsert unconditionally, even when the written key is
///   already resident.
/// * `dispose` is terminal and idempotent; every later operation is a
///   no-op that never reaches the strategy or the fetch strategy. Dropping
///   the cache disposes it, so the sweep timer is released on every path.
///
/// # Concurrency
///
/// Store-mutating operations assume a single logical mutator; internally
/// one mutex serializes them against the background sweep, so a
/// multi-threaded host gets consistent sweeps without extra locking, but
/// ordering between concurrent foreground mutators is the caller's
/// responsibility. [`read_or_fetch`](Self::read_or_fetch) suspends only at
/// the external fetch call and never holds the lock across an await.
/// Concurrent `read_or_fetch` calls for the same key are NOT deduplicated;
/// each miss invokes the data source independently.
///
/// # Examples
///
/// ```
/// use stratacache::{Cache, CacheConfig};
///
/// let cache: Cache<i32> = Cache::new(CacheConfig {
///     capacity: Some(2),
///     ..CacheConfig::default()
/// })
/// .unwrap();
///
/// cache.write("a", 1);
/// cache.write("b", 2);
/// cache.write("c", 3); // evicts "a" (base policy, FIFO)
///
/// assert_eq!(cache.size(), 2);
/// assert_eq!(cache.read("a"), None);
/// assert_eq!(cache.read("b"), Some(2));
/// assert_eq!(cache.read("c"), Some(3));
/// ```
pub struct Cache<V: Clone + Send + 'static> {
    shared: Arc<Shared<V>>,
    capacity: Option<usize>,
    ttl: Option<Duration>,
    cleanup_period: Duration,
    fetcher: Option<Arc<dyn FetchStrategy<V>>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl<V: Clone + Send + 'static> Cache<V> {
    /// Creates a cache with the base (FIFO) policy and no fetch strategy.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigError`] when the configuration is invalid.
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        Self::with_strategy(config, FifoStrategy::new())
    }

    /// Creates a cache with the given strategy and no fetch strategy.
    ///
    /// The strategy is exclusively owned by the cache and swappable only at
    /// construction.
    pub fn with_strategy<S>(config: CacheConfig, strategy: S) -> Result<Self, ConfigError>
    where
        S: CacheStrategy<V> + 'static,
    {
        Self::build(config, Box::new(strategy), None)
    }

    /// Creates a cache with the given strategy and a fetch-on-miss data
    /// source, enabling [`read_or_fetch`](Self::read_or_fetch).
    pub fn with_fetcher<S, F>(
        config: CacheConfig,
        strategy: S,
        fetcher: F,
    ) -> Result<Self, ConfigError>
    where
        S: CacheStrategy<V> + 'static,
        F: FetchStrategy<V> + 'static,
    {
        Self::build(config, Box::new(strategy), Some(Arc::new(fetcher)))
    }

    fn build(
        config: CacheConfig,
        strategy: Box<dyn CacheStrategy<V>>,
        fetcher: Option<Arc<dyn FetchStrategy<V>>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let name = config.name.unwrap_or_else(|| {
            format!("cache-{}", NEXT_CACHE_ID.fetch_add(1, Ordering::Relaxed))
        });

        let cache = Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(CacheInner {
                    store: CacheStore::new(),
                    strategy,
                    disposed: false,
                }),
                stats: CacheStats::new(),
                name,
                debug_trace: config.debug_trace,
            }),
            capacity: config.capacity,
            ttl: config.ttl,
            cleanup_period: config.cleanup_period,
            fetcher,
            sweeper: Mutex::new(None),
        };
        *cache.sweeper.lock() = cache.start_sweeper();
        Ok(cache)
    }

    // Public operations

    /// Reads the value for `key`.
    ///
    /// Returns `None` when the key is absent, expired, or the cache is
    /// disposed. An expired item is deleted first (lazy expiry) and fires
    /// `ITEM_EXPIRED`; a hit fires `ITEM_USED` before the value is
    /// returned. Whether a hit affects eviction order is up to the active
    /// strategy.
    pub fn read(&self, key: &str) -> Option<V> {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return None;
        }
        let CacheInner {
            store, strategy, ..
        } = &mut *inner;

        let now = Instant::now();
        let lazily_expired = store.get(key).map_or(false, |item| item.is_expired(now));
        if lazily_expired {
            if let Some(item) = store.remove(key) {
                self.shared.stats.record_expiration();
                emit(
                    &self.shared,
                    strategy.as_mut(),
                    CacheEvent::ItemExpired(ItemAccessData {
                        key: key.to_string(),
                        value: item.value,
                        size: store.len(),
                    }),
                );
            }
        }

        match strategy.read(store, key) {
            Some(value) => {
                self.shared.stats.record_hit();
                emit(
                    &self.shared,
                    strategy.as_mut(),
                    CacheEvent::ItemUsed(ItemAccessData {
                        key: key.to_string(),
                        value: value.clone(),
                        size: store.len(),
                    }),
                );
                Some(value)
            }
            None => {
                self.shared.stats.record_miss();
                None
            }
        }
    }

    /// Writes `value` under `key` with the cache-wide default ttl.
    ///
    /// No-op when disposed. If the store is at capacity before the upsert,
    /// exactly one eviction runs first. Fires `ITEM_ADDED` with the written
    /// item, the effective ttl, and the post-write size.
    pub fn write(&self, key: &str, value: V) {
        self.write_item(key, value, self.ttl, false);
    }

    /// Writes `value` under `key` with a per-item ttl override.
    ///
    /// `None` makes this item never expire regardless of the cache-wide
    /// default. Otherwise identical to [`write`](Self::write).
    pub fn write_with_ttl(&self, key: &str, value: V, ttl: Option<Duration>) {
        self.write_item(key, value, ttl, false);
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// No-op (returning `None`) when disposed or the key is absent. Fires
    /// `ITEM_REMOVED` with the value and the post-removal size.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return None;
        }
        let CacheInner {
            store, strategy, ..
        } = &mut *inner;

        let item = store.remove(key)?;
        let value = item.value;
        emit(
            &self.shared,
            strategy.as_mut(),
            CacheEvent::ItemRemoved(ItemAccessData {
                key: key.to_string(),
                value: value.clone(),
                size: store.len(),
            }),
        );
        Some(value)
    }

    /// Empties the cache.
    ///
    /// No-op when disposed. Fires one `CACHE_CLEARED` event carrying a
    /// snapshot of every removed item, then restarts the cleanup timer with
    /// a fresh period beginning now.
    pub fn clear(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.disposed {
                return;
            }
            let CacheInner {
                store, strategy, ..
            } = &mut *inner;

            let removed_items = store.drain();
            emit(
                &self.shared,
                strategy.as_mut(),
                CacheEvent::CacheCleared(CacheClearedData { removed_items }),
            );
        }

        // Fresh sweep period beginning now. The store lock is released
        // first: stopping joins the sweeper, which may be mid-sweep.
        let mut sweeper = self.sweeper.lock();
        drop(sweeper.take());
        *sweeper = self.start_sweeper();
    }

    /// Disposes the cache: stops the cleanup timer, clears the store, fires
    /// `CACHE_DISPOSED`, and latches the disposed flag.
    ///
    /// Idempotent: a second call produces no events and no side effects.
    /// Disposal is terminal: every subsequent operation returns its
    /// no-op/absent result without touching the store, the strategy, or the
    /// fetch strategy.
    pub fn dispose(&self) {
        if self.is_disposed() {
            return;
        }

        // Stop the timer before taking the store lock so an in-flight
        // sweep can finish instead of deadlocking against the join.
        drop(self.sweeper.lock().take());

        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return;
        }
        let CacheInner {
            store,
            strategy,
            disposed,
        } = &mut *inner;

        store.drain();
        emit(&self.shared, strategy.as_mut(), CacheEvent::CacheDisposed);
        *disposed = true;
    }

    /// Reads the value for `key`, falling back to the configured fetch
    /// strategy on a miss.
    ///
    /// A hit returns immediately without touching the data source. On a
    /// miss with no fetch strategy configured, resolves to `Ok(None)`. A
    /// fetched value is written through the same capacity/eviction/event
    /// path as [`write`](Self::write), firing `ITEM_FETCHED` instead of
    /// `ITEM_ADDED`, and is then returned; an absent fetch result leaves
    /// the store untouched.
    ///
    /// # Errors
    ///
    /// Data-source failures propagate untouched; the cache neither swallows
    /// nor retries them.
    pub async fn read_or_fetch(&self, key: &str) -> Result<Option<V>, FetchError> {
        if let Some(value) = self.read(key) {
            return Ok(Some(value));
        }
        let Some(fetcher) = self.fetcher.clone() else {
            return Ok(None);
        };
        if self.is_disposed() {
            return Ok(None);
        }

        let Some(value) = fetcher.fetch(key).await? else {
            return Ok(None);
        };
        // write_item re-checks the disposal latch, so a fetch completing
        // after dispose() cannot repopulate the store.
        self.write_item(key, value.clone(), self.ttl, true);
        Ok(Some(value))
    }

    // Accessors

    /// Upper bound on resident items; `None` means unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of currently resident items (expired-but-unswept included).
    pub fn size(&self) -> usize {
        self.shared.inner.lock().store.len()
    }

    /// The cache-wide default ttl; `None` means items never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// The background sweep period; zero means the sweep is disabled.
    pub fn cleanup_period(&self) -> Duration {
        self.cleanup_period
    }

    /// Whether the cache has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.shared.inner.lock().disposed
    }

    /// The instance label used in the debug trace.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Hit/miss/eviction/expiration counters for this cache.
    pub fn stats(&self) -> &CacheStats {
        &self.shared.stats
    }

    // Internals

    fn write_item(&self, key: &str, value: V, ttl: Option<Duration>, fetched: bool) {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return;
        }
        let CacheInner {
            store, strategy, ..
        } = &mut *inner;

        // The capacity check precedes the upsert unconditionally, even
        // when `key` is already resident.
        if let Some(capacity) = self.capacity {
            if store.len() >= capacity {
                evict_one(&self.shared, store, strategy.as_mut());
            }
        }

        let item = CacheItem::new(value, ttl);
        let written = item.clone();
        strategy.write(store, key, item);

        let data = ItemWriteData {
            key: key.to_string(),
            item: written,
            ttl,
            size: store.len(),
        };
        let event = if fetched {
            CacheEvent::ItemFetched(data)
        } else {
            CacheEvent::ItemAdded(data)
        };
        emit(&self.shared, strategy.as_mut(), event);
    }

    fn start_sweeper(&self) -> Option<Sweeper> {
        if self.cleanup_period.is_zero() {
            return None;
        }
        let shared = Arc::downgrade(&self.shared);
        Some(Sweeper::spawn(
            &self.shared.name,
            self.cleanup_period,
            move || match shared.upgrade() {
                Some(shared) => {
                    sweep(&shared);
                    true
                }
                None => false,
            },
        ))
    }
}

impl<V: Clone + Send + 'static> Drop for Cache<V> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// One pass of the active sweep: deletes every expired entry and fires one
/// `ITEM_EXPIRED` event per deletion. No-op while disposed.
fn sweep<V>(shared: &Shared<V>) {
    let mut inner = shared.inner.lock();
    if inner.disposed {
        return;
    }

    let now = Instant::now();
    let expired: Vec<String> = inner
        .store
        .iter()
        .filter(|(_, item)| item.is_expired(now))
        .map(|(key, _)| key.to_string())
        .collect();

    let CacheInner {
        store, strategy, ..
    } = &mut *inner;
    for key in expired {
        if let Some(item) = store.remove(&key) {
            shared.stats.record_expiration();
            emit(
                shared,
                strategy.as_mut(),
                CacheEvent::ItemExpired(ItemAccessData {
                    key,
                    value: item.value,
                    size: store.len(),
                }),
            );
        }
    }
}

/// Removes the strategy's eviction candidate and fires `ITEM_EVICTED`.
///
/// Only called when `store.len() >= capacity > 0`, so a missing candidate
/// is an invariant violation, not a runtime condition.
fn evict_one<V>(shared: &Shared<V>, store: &mut CacheStore<V>, strategy: &mut dyn CacheStrategy<V>) {
    let key = strategy.key_to_evict(store).unwrap_or_else(|| {
        panic!(
            "cache {}: strategy returned no eviction candidate for a store of {} items",
            shared.name,
            store.len()
        )
    });
    let item = store
        .remove(&key)
        .unwrap_or_else(|| panic!("cache {}: eviction candidate {key} is not resident", shared.name));

    shared.stats.record_eviction();
    emit(
        shared,
        strategy,
        CacheEvent::ItemEvicted(ItemAccessData {
            key,
            value: item.value,
            size: store.len(),
        }),
    );
}

/// Dispatches an event to the strategy hooks, tracing it first when the
/// debug trace is enabled. Dispatch is synchronous: the triggering
/// operation does not return until every reaction has run.
fn emit<V>(shared: &Shared<V>, strategy: &mut dyn CacheStrategy<V>, event: CacheEvent<V>) {
    if shared.debug_trace {
        debug!(
            target: "stratacache",
            cache = %shared.name,
            event = event.kind(),
            key = ?event.key(),
            size = ?event.size(),
            "cache event"
        );
    }
    event::dispatch(strategy, &event);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(capacity: usize) -> CacheConfig {
        CacheConfig {
            capacity: Some(capacity),
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_basic_write_read() {
        let cache: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
        cache.write("key1", 100);
        assert_eq!(cache.read("key1"), Some(100));
        assert_eq!(cache.read("missing"), None);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        assert_eq!(
            Cache::<i32>::new(bounded(0)).err(),
            Some(ConfigError::InvalidCapacity)
        );
        let config = CacheConfig {
            ttl: Some(Duration::ZERO),
            ..CacheConfig::default()
        };
        assert_eq!(Cache::<i32>::new(config).err(), Some(ConfigError::InvalidTtl));
    }

    #[test]
    fn test_size_tracks_distinct_keys_under_capacity() {
        let cache: Cache<i32> = Cache::new(bounded(10)).unwrap();
        for i in 0..5 {
            cache.write(&format!("k{i}"), i);
        }
        cache.write("k0", 100); // replacement, no size change
        assert_eq!(cache.size(), 5);
    }

    #[test]
    fn test_capacity_check_precedes_upsert_even_on_replacement() {
        let cache: Cache<i32> = Cache::new(bounded(2)).unwrap();
        cache.write("k1", 1);
        cache.write("k2", 2);

        // Overwriting at full capacity still evicts exactly one item.
        cache.write("k1", 10);
        assert_eq!(cache.stats().evictions(), 1);
        assert_eq!(cache.size(), 2); // k1 (evicted then rewritten) and k2
        assert_eq!(cache.read("k1"), Some(10));
    }

    #[test]
    fn test_generated_names_are_distinct() {
        let a: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
        let b: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
        assert_ne!(a.name(), b.name());

        let named: Cache<i32> = Cache::new(CacheConfig {
            name: Some("sessions".to_string()),
            ..CacheConfig::default()
        })
        .unwrap();
        assert_eq!(named.name(), "sessions");
    }

    #[test]
    fn test_accessors_reflect_config() {
        let cache: Cache<i32> = Cache::new(CacheConfig {
            capacity: Some(50),
            ttl: Some(Duration::from_secs(60)),
            cleanup_period: Duration::from_secs(10),
            ..CacheConfig::default()
        })
        .unwrap();

        assert_eq!(cache.capacity(), Some(50));
        assert_eq!(cache.ttl(), Some(Duration::from_secs(60)));
        assert_eq!(cache.cleanup_period(), Duration::from_secs(10));
        assert_eq!(cache.size(), 0);
        assert!(!cache.is_disposed());
    }

    #[test]
    fn test_remove_returns_value() {
        let cache: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
        cache.write("k1", 1);

        assert_eq!(cache.remove("k1"), Some(1));
        assert_eq!(cache.remove("k1"), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_dispose_is_idempotent_and_terminal() {
        let cache: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
        cache.write("k1", 1);

        cache.dispose();
        assert!(cache.is_disposed());
        assert_eq!(cache.size(), 0);

        cache.dispose(); // second call is a no-op

        cache.write("k2", 2);
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.read("k1"), None);
        assert_eq!(cache.remove("k1"), None);
        cache.clear();
        assert!(cache.is_disposed());
    }
}
