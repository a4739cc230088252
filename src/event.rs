use std::time::Duration;

use crate::{CacheItem, CacheStrategy};

/// Payload for [`CacheEvent::ItemAdded`] and [`CacheEvent::ItemFetched`].
#[derive(Debug, Clone)]
pub struct ItemWriteData<V> {
    pub key: String,
    /// The item as written, including its computed expiry.
    pub item: CacheItem<V>,
    /// The effective ttl for this write (`None` means never expires).
    pub ttl: Option<Duration>,
    /// Store size after the write.
    pub size: usize,
}

/// Payload for [`CacheEvent::ItemUsed`], [`CacheEvent::ItemExpired`],
/// [`CacheEvent::ItemEvicted`] and [`CacheEvent::ItemRemoved`].
#[derive(Debug, Clone)]
pub struct ItemAccessData<V> {
    pub key: String,
    pub value: V,
    /// Store size after the operation.
    pub size: usize,
}

/// Payload for [`CacheEvent::CacheCleared`].
#[derive(Debug, Clone)]
pub struct CacheClearedData<V> {
    /// Snapshot of every item that was resident when the cache was cleared,
    /// in store order.
    pub removed_items: Vec<CacheItem<V>>,
}

/// The closed set of cache lifecycle events.
///
/// Events are dispatched synchronously, in-line with the operation that
/// raises them: the operation does not return to its caller until every
/// registered reaction has run. The enumeration being closed means an
/// unrecognized event is unrepresentable; dispatch matches exhaustively.
#[derive(Debug, Clone)]
pub enum CacheEvent<V> {
    /// A value was written via `write`/`write_with_ttl`.
    ItemAdded(ItemWriteData<V>),
    /// A value was written after a successful fetch-on-miss.
    ItemFetched(ItemWriteData<V>),
    /// A read returned a resident value.
    ItemUsed(ItemAccessData<V>),
    /// An expired item was deleted, lazily on read or by the sweep.
    ItemExpired(ItemAccessData<V>),
    /// An item was evicted by the strategy to make room at capacity.
    ItemEvicted(ItemAccessData<V>),
    /// An item was explicitly removed.
    ItemRemoved(ItemAccessData<V>),
    /// The cache was cleared; carries the removed-item snapshot.
    CacheCleared(CacheClearedData<V>),
    /// The cache was disposed. Carries no data.
    CacheDisposed,
}

impl<V> CacheEvent<V> {
    /// Stable tag for the event, used by the debug trace.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheEvent::ItemAdded(_) => "ITEM_ADDED",
            CacheEvent::ItemFetched(_) => "ITEM_FETCHED",
            CacheEvent::ItemUsed(_) => "ITEM_USED",
            CacheEvent::ItemExpired(_) => "ITEM_EXPIRED",
            CacheEvent::ItemEvicted(_) => "ITEM_EVICTED",
            CacheEvent::ItemRemoved(_) => "ITEM_REMOVED",
            CacheEvent::CacheCleared(_) => "CACHE_CLEARED",
            CacheEvent::CacheDisposed => "CACHE_DISPOSED",
        }
    }

    /// The key the event concerns, when it concerns a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            CacheEvent::ItemAdded(data) | CacheEvent::ItemFetched(data) => Some(&data.key),
            CacheEvent::ItemUsed(data)
            | CacheEvent::ItemExpired(data)
            | CacheEvent::ItemEvicted(data)
            | CacheEvent::ItemRemoved(data) => Some(&data.key),
            CacheEvent::CacheCleared(_) | CacheEvent::CacheDisposed => None,
        }
    }

    /// The post-operation store size carried by the event, when any.
    pub fn size(&self) -> Option<usize> {
        match self {
            CacheEvent::ItemAdded(data) | CacheEvent::ItemFetched(data) => Some(data.size),
            CacheEvent::ItemUsed(data)
            | CacheEvent::ItemExpired(data)
            | CacheEvent::ItemEvicted(data)
            | CacheEvent::ItemRemoved(data) => Some(data.size),
            CacheEvent::CacheCleared(_) | CacheEvent::CacheDisposed => None,
        }
    }
}

/// Routes an event to the matching strategy hook.
///
/// A strategy implements any subset of the hooks; the defaults are no-ops,
/// so a missing handler is never an error.
pub(crate) fn dispatch<V>(strategy: &mut dyn CacheStrategy<V>, event: &CacheEvent<V>) {
    match event {
        CacheEvent::ItemAdded(data) => strategy.on_item_added(data),
        CacheEvent::ItemFetched(data) => strategy.on_item_fetched(data),
        CacheEvent::ItemUsed(data) => strategy.on_item_used(data),
        CacheEvent::ItemExpired(data) => strategy.on_item_expired(data),
        CacheEvent::ItemEvicted(data) => strategy.on_item_evicted(data),
        CacheEvent::ItemRemoved(data) => strategy.on_item_removed(data),
        CacheEvent::CacheCleared(data) => strategy.on_cache_cleared(data),
        CacheEvent::CacheDisposed => strategy.on_cache_disposed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds_are_stable() {
        let used: CacheEvent<i32> = CacheEvent::ItemUsed(ItemAccessData {
            key: "k".to_string(),
            value: 1,
            size: 1,
        });
        assert_eq!(used.kind(), "ITEM_USED");
        assert_eq!(used.key(), Some("k"));
        assert_eq!(used.size(), Some(1));

        let disposed: CacheEvent<i32> = CacheEvent::CacheDisposed;
        assert_eq!(disposed.kind(), "CACHE_DISPOSED");
        assert_eq!(disposed.key(), None);
        assert_eq!(disposed.size(), None);
    }
}
