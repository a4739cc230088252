use std::time::{Duration, Instant};

/// The stored envelope for a cached value: the value itself plus the
/// absolute instant at which it expires.
///
/// An item is pure data. It is created once and replaced on every write;
/// it is never mutated in place.
///
/// # Fields
///
/// * `value` - The cached value
/// * `expiry` - The absolute expiry instant; `None` means the item never
///   expires
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use stratacache::CacheItem;
///
/// let item = CacheItem::new(42, Some(Duration::from_secs(60)));
/// assert_eq!(item.value, 42);
/// assert!(!item.is_expired(Instant::now()));
///
/// // `None` is the "never expires" sentinel
/// let forever = CacheItem::new("data", None);
/// assert!(forever.expiry.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem<V> {
    pub value: V,
    pub expiry: Option<Instant>,
}

impl<V> CacheItem<V> {
    /// Creates a new item whose expiry is `now + ttl`, or an item that
    /// never expires when `ttl` is `None`.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expiry: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    /// Returns true if the item has expired at the given instant.
    ///
    /// The comparison is strict: an item read at exactly its expiry instant
    /// is NOT expired. An item without an expiry never expires.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use stratacache::CacheItem;
    ///
    /// let item = CacheItem::new(1, Some(Duration::from_millis(50)));
    /// let expiry = item.expiry.unwrap();
    ///
    /// assert!(!item.is_expired(expiry)); // boundary: equality is not expired
    /// assert!(item.is_expired(expiry + Duration::from_millis(1)));
    /// ```
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expiry {
            Some(expiry) => now > expiry,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_item_not_expired() {
        let item = CacheItem::new(42, Some(Duration::from_secs(10)));
        assert_eq!(item.value, 42);
        assert!(!item.is_expired(Instant::now()));
    }

    #[test]
    fn test_item_expires_strictly_after_expiry() {
        let item = CacheItem::new("data", Some(Duration::from_secs(1)));
        let expiry = item.expiry.expect("bounded ttl must set an expiry");

        assert!(!item.is_expired(expiry - Duration::from_millis(1)));
        assert!(!item.is_expired(expiry));
        assert!(item.is_expired(expiry + Duration::from_millis(1)));
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let item = CacheItem::new(100, None);
        let far_future = Instant::now() + Duration::from_secs(3600 * 24 * 365);
        assert!(!item.is_expired(far_future));
    }
}
