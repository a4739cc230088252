use std::time::Duration;

use crate::ConfigError;

/// Construction-time configuration for a [`Cache`](crate::Cache).
///
/// All fields are plain data; validation happens once, at construction,
/// and invalid values fail the construction attempt immediately.
///
/// # Fields
///
/// * `capacity` - Upper bound on resident items. `None` means unbounded;
///   `Some(0)` is invalid.
/// * `ttl` - Default per-item lifetime. `None` means items never expire;
///   `Some(Duration::ZERO)` is invalid (disabling expiry requires the
///   explicit `None` sentinel, not zero).
/// * `cleanup_period` - How often the background sweep removes expired
///   items. `Duration::ZERO` (the default) disables the sweep.
/// * `debug_trace` - When enabled, every lifecycle event also emits a
///   human-readable `tracing` line at debug level.
/// * `name` - Label used in the debug trace. When absent, a `cache-N`
///   identifier is generated from a process-wide counter.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stratacache::CacheConfig;
///
/// let config = CacheConfig {
///     capacity: Some(100),
///     ttl: Some(Duration::from_secs(60)),
///     cleanup_period: Duration::from_secs(10),
///     ..CacheConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub capacity: Option<usize>,
    pub ttl: Option<Duration>,
    pub cleanup_period: Duration,
    pub debug_trace: bool,
    pub name: Option<String>,
}

impl CacheConfig {
    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidCapacity`] when `capacity` is `Some(0)`
    /// * [`ConfigError::InvalidTtl`] when `ttl` is `Some(Duration::ZERO)`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == Some(0) {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.ttl == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidTtl);
        }
        Ok(())
    }
}
