//! Cache Module
//!
//! Provides bounded in-memory caching with CLOCK eviction and TTL expiration,
//! plus unbounded map-backed caches sharing the same [`Cache`] interface.

mod clock;
mod entry;
mod expiring;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::ClockCache;
pub use entry::CacheEntry;
pub use expiring::ExpiringClockCache;
pub use stats::CacheStats;
pub use store::{ExpiringCache, UnboundedCache};

// == Cache Trait ==
/// Common interface over every cache in this crate.
///
/// Object safe, so callers can hold an `Arc<dyn Cache<K, V>>` and swap the
/// eviction strategy without touching call sites. Absence is always `None`
/// or the caller's default, never an error.
pub trait Cache<K, V>: Send + Sync {
    /// Returns the value for `key`, or None if absent or expired.
    fn get(&self, key: &K) -> Option<V>;

    /// Returns the value for `key`, or `default` if absent or expired.
    fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Adds `key` to the cache with `value`.
    fn put(&self, key: K, value: V);

    /// Removes `key` from the cache.
    fn invalidate(&self, key: &K);

    /// Removes all entries from the cache.
    fn clear(&self);
}
