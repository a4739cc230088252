use thiserror::Error;

/// Errors raised synchronously at cache construction.
///
/// Configuration errors are fatal to the construction attempt and are never
/// recovered internally. A cleanup period of zero is valid configuration
/// (it disables the background sweep), and negative durations are not
/// representable, so no variant exists for the cleanup period.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `capacity` was `Some(0)`. An unbounded cache is configured with
    /// `None`, never with zero.
    #[error("cache capacity must be greater than 0 (use None for an unbounded cache)")]
    InvalidCapacity,

    /// `ttl` was `Some(Duration::ZERO)`. Expiry is disabled with `None`,
    /// never with a zero duration.
    #[error("cache ttl must be greater than 0 (use None to disable expiry)")]
    InvalidTtl,
}

/// Failure surfaced by a [`FetchStrategy`](crate::FetchStrategy).
///
/// The cache core propagates data-source failures to the caller of
/// [`read_or_fetch`](crate::Cache::read_or_fetch) untouched; retry policy,
/// if any, belongs to the fetch strategy implementation.
pub type FetchError = Box<dyn std::error::Error + Send + Sync + 'static>;
