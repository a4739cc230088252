use std::collections::{HashMap, VecDeque};

use crate::CacheItem;

/// Insertion-ordered backing store mapping string keys to cache items.
///
/// Pairs a `HashMap` for O(1) lookup with a `VecDeque` of keys that
/// remembers order. The queue front is always the oldest entry in the
/// maintained order, which is what both shipped policies evict:
///
/// - under FIFO, order is insertion order (replacing an existing key keeps
///   its position),
/// - under LRU, [`touch`](Self::touch) re-queues a key to the back on every
///   use, so the front is the least recently used key.
///
/// Invariant: every key in the map appears exactly once in the queue, and
/// vice versa.
#[derive(Debug, Default)]
pub struct CacheStore<V> {
    map: HashMap<String, CacheItem<V>>,
    order: VecDeque<String>,
}

impl<V> CacheStore<V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Number of resident items.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no items are resident.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns true if `key` is resident (expired or not).
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Looks up the item for `key` without affecting order.
    pub fn get(&self, key: &str) -> Option<&CacheItem<V>> {
        self.map.get(key)
    }

    /// Inserts or replaces the item for `key`, returning the previous item
    /// if one was resident.
    ///
    /// A new key is appended to the back of the order queue; replacing an
    /// existing key keeps its current position.
    pub fn insert(&mut self, key: &str, item: CacheItem<V>) -> Option<CacheItem<V>> {
        let previous = self.map.insert(key.to_string(), item);
        if previous.is_none() {
            self.order.push_back(key.to_string());
        }
        previous
    }

    /// Removes and returns the item for `key`, dropping it from the order
    /// queue as well.
    pub fn remove(&mut self, key: &str) -> Option<CacheItem<V>> {
        let item = self.map.remove(key)?;
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        Some(item)
    }

    /// Moves `key` to the back of the order queue (most recently used).
    ///
    /// No effect if the key is not resident.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratacache::{CacheItem, CacheStore};
    ///
    /// let mut store = CacheStore::new();
    /// store.insert("a", CacheItem::new(1, None));
    /// store.insert("b", CacheItem::new(2, None));
    ///
    /// store.touch("a");
    /// assert_eq!(store.front_key(), Some("b"));
    /// ```
    pub fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
            self.order.push_back(key.to_string());
        }
    }

    /// The key at the front of the order queue, i.e. the oldest entry in
    /// the maintained order.
    pub fn front_key(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    /// Iterates keys in queue order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterates `(key, item)` pairs in queue order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheItem<V>)> {
        self.order
            .iter()
            .filter_map(move |key| self.map.get(key).map(|item| (key.as_str(), item)))
    }

    /// Empties the store, returning the removed items in queue order.
    pub fn drain(&mut self) -> Vec<CacheItem<V>> {
        let keys: Vec<String> = self.order.drain(..).collect();
        keys.iter().filter_map(|key| self.map.remove(key)).collect()
    }
}
