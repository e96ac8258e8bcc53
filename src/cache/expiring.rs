//! Expiring CLOCK Cache Module
//!
//! CLOCK cache whose entries expire after a TTL.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{Cache, CacheStats, ClockCache};
use crate::error::{validate_ttl, Result};

// == Expiring Clock Cache ==
/// Bounded CLOCK cache where every entry carries an expiry.
///
/// Expired entries read as absent straight away, but keep their slot until the
/// eviction sweep reaches it or [`purge_expired`](Self::purge_expired) runs.
pub struct ExpiringClockCache<K, V> {
    inner: ClockCache<K, V>,
}

impl<K, V> ExpiringClockCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache with `capacity` slots and a default TTL for `put`.
    ///
    /// # Errors
    /// - [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity) when `capacity` is zero
    /// - [`CacheError::InvalidTtl`](crate::CacheError::InvalidTtl) when `default_ttl` is zero
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Ok(Self {
            inner: ClockCache::build(capacity, Some(default_ttl))?,
        })
    }

    /// Returns the value under `key` if present and not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    /// Returns the value under `key`, or `default` when absent or expired.
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get_or(key, default)
    }

    /// Stores `value` under `key`, expiring after the default TTL.
    pub fn put(&self, key: K, value: V) {
        self.inner.put(key, value);
    }

    // == Put With TTL ==
    /// Stores `value` under `key`, expiring after `ttl` instead of the default.
    ///
    /// Updating an existing key restarts its expiry from now.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidTtl`](crate::CacheError::InvalidTtl) when
    /// `ttl` is zero; the cache is left untouched.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        let ttl = validate_ttl(ttl)?;
        self.inner.insert(key, value, Some(ttl));
        Ok(())
    }

    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.invalidate(key);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    // == Purge Expired ==
    /// Removes every expired entry, freeing its slot.
    ///
    /// Returns the number of entries removed. Purged entries are not counted
    /// as evictions.
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    /// Returns the number of resident entries, expired ones included until
    /// they are reclaimed.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Returns the TTL applied by [`put`](Self::put).
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl().unwrap_or_default()
    }
}

impl<K: Eq + Hash, V> fmt::Debug for ExpiringClockCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpiringClockCache").field(&self.inner).finish()
    }
}

impl<K, V> Cache<K, V> for ExpiringClockCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    fn put(&self, key: K, value: V) {
        self.inner.put(key, value);
    }

    fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    fn clear(&self) {
        self.inner.clear();
    }
}
