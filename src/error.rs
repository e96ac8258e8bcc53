//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only construction can fail. Lookups signal absence with `None` or the
/// caller's default, never with an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be at least one slot
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// TTL must be strictly positive
    #[error("Invalid TTL: {0:?} (must be greater than zero)")]
    InvalidTtl(Duration),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Validation Helpers ==
/// Rejects a zero capacity.
pub(crate) fn validate_capacity(capacity: usize) -> Result<usize> {
    if capacity == 0 {
        return Err(CacheError::InvalidCapacity(capacity));
    }
    Ok(capacity)
}

/// Rejects a zero TTL.
pub(crate) fn validate_ttl(ttl: Duration) -> Result<Duration> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidTtl(ttl));
    }
    Ok(ttl)
}
