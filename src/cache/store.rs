//! Map-Backed Store Module
//!
//! Unbounded caches backed by a plain HashMap: one without expiry, one with.
//! Neither evicts; use them where the key space is known to stay small.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::stats::Counters;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::error::{validate_ttl, Result};

// == Unbounded Cache ==
/// Cache with no capacity bound and no expiry.
#[derive(Debug)]
pub struct UnboundedCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
    counters: Counters,
}

impl<K, V> Default for UnboundedCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counters: Counters::default(),
        }
    }
}

impl<K, V> UnboundedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.entries.read().get(key).cloned();
        match value {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        value
    }

    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.counters.reset();
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len(), 0)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, V> Cache<K, V> for UnboundedCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        UnboundedCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        UnboundedCache::put(self, key, value);
    }

    fn invalidate(&self, key: &K) {
        UnboundedCache::invalidate(self, key);
    }

    fn clear(&self) {
        UnboundedCache::clear(self);
    }
}

// == Expiring Cache ==
/// Unbounded cache where every entry expires after a TTL.
///
/// Expired entries read as absent and stay in the map until overwritten,
/// invalidated, or removed by [`purge_expired`](Self::purge_expired).
#[derive(Debug)]
pub struct ExpiringCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    counters: Counters,
    default_ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache applying `default_ttl` to every `put`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidTtl`](crate::CacheError::InvalidTtl) when
    /// `default_ttl` is zero.
    pub fn new(default_ttl: Duration) -> Result<Self> {
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            counters: Counters::default(),
            default_ttl: validate_ttl(default_ttl)?,
        })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let value = self
            .entries
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        value
    }

    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn put(&self, key: K, value: V) {
        self.entries
            .write()
            .insert(key, CacheEntry::new(value, Some(self.default_ttl)));
    }

    /// Stores `value` under `key`, expiring after `ttl` instead of the default.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        let ttl = validate_ttl(ttl)?;
        self.entries
            .write()
            .insert(key, CacheEntry::new(value, Some(ttl)));
        Ok(())
    }

    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.counters.reset();
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "purged expired entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len(), 0)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl<K, V> Cache<K, V> for ExpiringCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        ExpiringCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        ExpiringCache::put(self, key, value);
    }

    fn invalidate(&self, key: &K) {
        ExpiringCache::invalidate(self, key);
    }

    fn clear(&self) {
        ExpiringCache::clear(self);
    }
}
