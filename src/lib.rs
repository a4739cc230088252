//! # Stratacache
//!
//! An embeddable, in-process key-value cache engine with pluggable
//! eviction strategies, TTL expiry, background cleanup, an observable
//! lifecycle-event channel, and optional cache-aside fetching.
//!
//! ## Features
//!
//! - **Pluggable policy**: the [`CacheStrategy`] trait decides how reads
//!   affect order and which item is evicted; FIFO and LRU ship in the box
//! - **TTL expiry**: per-cache default with per-item override, enforced
//!   lazily on read and actively by a background sweep
//! - **Lifecycle events**: a closed [`CacheEvent`] set dispatched
//!   synchronously to whichever hooks the strategy implements
//! - **Cache-aside**: [`Cache::read_or_fetch`] falls back to an async
//!   [`FetchStrategy`] on a miss and populates the cache with the result
//! - **Statistics**: atomic hit/miss/eviction/expiration counters
//! - **Forgiving teardown**: disposal turns every operation into a safe
//!   no-op instead of a failure
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use stratacache::{Cache, CacheConfig, LruStrategy};
//!
//! let cache: Cache<String> = Cache::with_strategy(
//!     CacheConfig {
//!         capacity: Some(3),
//!         ttl: Some(Duration::from_secs(60)),
//!         ..CacheConfig::default()
//!     },
//!     LruStrategy::new(),
//! )
//! .unwrap();
//!
//! cache.write("k1", "v1".to_string());
//! cache.write("k2", "v2".to_string());
//! cache.write("k3", "v3".to_string());
//!
//! // Reading k1 makes it most recently used, so k2 is evicted next.
//! cache.read("k1");
//! cache.write("k4", "v4".to_string());
//!
//! assert_eq!(cache.read("k2"), None);
//! assert!(cache.read("k1").is_some());
//! ```

mod cache;
mod config;
mod error;
mod event;
mod fetch;
mod item;
mod stats;
mod store;
mod strategy;
mod sweeper;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{ConfigError, FetchError};
pub use event::{CacheClearedData, CacheEvent, ItemAccessData, ItemWriteData};
pub use fetch::{FetchStrategy, StaticFetcher};
pub use item::CacheItem;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use strategy::{CacheStrategy, FifoStrategy, LruStrategy};
