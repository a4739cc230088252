use crate::event::{CacheClearedData, ItemAccessData, ItemWriteData};
use crate::{CacheItem, CacheStore};

/// The pluggable policy consulted by the cache container.
///
/// A strategy decides two things: how an item is read from the backing
/// store (whether the read affects order), and which key is evicted when
/// the container is full. It never owns the store (it operates on the store
/// the container passes in) but may carry its own state, for example to
/// count events through the lifecycle hooks.
///
/// # Lifecycle hooks
///
/// Every `on_*` method has a default no-op body, so a strategy implements
/// any subset of them. The container dispatches each event to the matching
/// hook synchronously, before the triggering operation returns.
///
/// # Implementing a custom policy
///
/// ```
/// use stratacache::{CacheStore, CacheStrategy, ItemAccessData};
///
/// /// Evicts the front of the order queue and counts evictions.
/// #[derive(Default)]
/// struct CountingFifo {
///     evictions: usize,
/// }
///
/// impl CacheStrategy<String> for CountingFifo {
///     fn read(&mut self, store: &mut CacheStore<String>, key: &str) -> Option<String> {
///         store.get(key).map(|item| item.value.clone())
///     }
///
///     fn key_to_evict(&mut self, store: &CacheStore<String>) -> Option<String> {
///         store.front_key().map(str::to_string)
///     }
///
///     fn on_item_evicted(&mut self, _data: &ItemAccessData<String>) {
///         self.evictions += 1;
///     }
/// }
/// ```
pub trait CacheStrategy<V>: Send {
    /// Reads the value for `key` from the store, applying any policy side
    /// effect (LRU re-queues the key). Returns `None` on a miss.
    fn read(&mut self, store: &mut CacheStore<V>, key: &str) -> Option<V>;

    /// Picks the key to evict when the container is full.
    ///
    /// The container only asks for an eviction candidate when the store is
    /// non-empty; returning `None` then is a strategy bug and aborts the
    /// operation.
    fn key_to_evict(&mut self, store: &CacheStore<V>) -> Option<String>;

    /// Writes `item` under `key`.
    ///
    /// The default keeps an existing key's position in the order queue and
    /// appends new keys, which is what the base policy wants. Policies for
    /// which a replacement counts as a use override this.
    fn write(&mut self, store: &mut CacheStore<V>, key: &str, item: CacheItem<V>) {
        store.insert(key, item);
    }

    /// Called after a value is written via `write`/`write_with_ttl`.
    fn on_item_added(&mut self, _data: &ItemWriteData<V>) {}

    /// Called after a fetched value is written into the cache.
    fn on_item_fetched(&mut self, _data: &ItemWriteData<V>) {}

    /// Called after a read returned a resident value.
    fn on_item_used(&mut self, _data: &ItemAccessData<V>) {}

    /// Called after an expired item was deleted.
    fn on_item_expired(&mut self, _data: &ItemAccessData<V>) {}

    /// Called after this strategy's eviction candidate was removed.
    fn on_item_evicted(&mut self, _data: &ItemAccessData<V>) {}

    /// Called after an item was explicitly removed.
    fn on_item_removed(&mut self, _data: &ItemAccessData<V>) {}

    /// Called after the cache was cleared.
    fn on_cache_cleared(&mut self, _data: &CacheClearedData<V>) {}

    /// Called once, when the cache is disposed.
    fn on_cache_disposed(&mut self) {}
}

/// The base policy: reads are direct lookups with no reordering, and the
/// eviction candidate is the earliest-inserted resident key.
///
/// Because the store preserves insertion order and replacement keeps a
/// key's position, this is FIFO eviction. The choice is deterministic and
/// documented, not random.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoStrategy;

impl FifoStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl<V: Clone> CacheStrategy<V> for FifoStrategy {
    fn read(&mut self, store: &mut CacheStore<V>, key: &str) -> Option<V> {
        store.get(key).map(|item| item.value.clone())
    }

    fn key_to_evict(&mut self, store: &CacheStore<V>) -> Option<String> {
        store.front_key().map(str::to_string)
    }
}

/// Least Recently Used policy.
///
/// A read hit re-queues the key to the back of the order, so order is
/// recency of use. Writes count as a use too: a new key is appended, and a
/// write replacing an existing key moves it to the back. The eviction
/// candidate is the front of the queue, the least recently used key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruStrategy;

impl LruStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl<V: Clone> CacheStrategy<V> for LruStrategy {
    fn read(&mut self, store: &mut CacheStore<V>, key: &str) -> Option<V> {
        let value = store.get(key)?.value.clone();
        store.touch(key);
        Some(value)
    }

    fn key_to_evict(&mut self, store: &CacheStore<V>) -> Option<String> {
        store.front_key().map(str::to_string)
    }

    fn write(&mut self, store: &mut CacheStore<V>, key: &str, item: CacheItem<V>) {
        store.insert(key, item);
        store.touch(key);
    }
}
