use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::FetchError;

/// External data-source contract for cache-aside reads.
///
/// The cache calls [`fetch`](Self::fetch) only on a confirmed miss. A
/// `Ok(None)` result means the source has no value for the key and is not
/// an error; an `Err` propagates untouched to the caller of
/// [`read_or_fetch`](crate::Cache::read_or_fetch).
///
/// There is no cancellation token: a fetch that never resolves leaves the
/// corresponding `read_or_fetch` call pending. Disposal does not cancel an
/// in-flight fetch, but a fetch completing after disposal is prevented from
/// mutating the store.
#[async_trait]
pub trait FetchStrategy<V>: Send + Sync {
    /// Resolves the value for `key`, or `None` when the source has none.
    async fn fetch(&self, key: &str) -> Result<Option<V>, FetchError>;
}

/// A programmable fetch strategy backed by a preset key-value table.
///
/// Useful as a stand-in data source in host tests: preset the values a key
/// should resolve to, and every fetch is an immediate table lookup.
///
/// # Examples
///
/// ```
/// use stratacache::{FetchStrategy, StaticFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetcher = StaticFetcher::new();
/// fetcher.set_value("user:1", "alice".to_string());
///
/// assert_eq!(fetcher.fetch("user:1").await.unwrap(), Some("alice".to_string()));
/// assert_eq!(fetcher.fetch("user:2").await.unwrap(), None);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StaticFetcher<V> {
    values: Mutex<HashMap<String, V>>,
}

impl<V: Clone> StaticFetcher<V> {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Presets the value fetches of `key` will resolve to.
    pub fn set_value(&self, key: &str, value: V) {
        self.values.lock().insert(key.to_string(), value);
    }

    /// Removes the preset for `key`; subsequent fetches resolve to `None`.
    pub fn unset_value(&self, key: &str) {
        self.values.lock().remove(key);
    }

    /// Removes every preset.
    pub fn clear_values(&self) {
        self.values.lock().clear();
    }
}

#[async_trait]
impl<V: Clone + Send + Sync> FetchStrategy<V> for StaticFetcher<V> {
    async fn fetch(&self, key: &str) -> Result<Option<V>, FetchError> {
        Ok(self.values.lock().get(key).cloned())
    }
}
