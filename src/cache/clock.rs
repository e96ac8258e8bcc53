//! CLOCK Cache Module
//!
//! Fixed-capacity cache that approximates LRU with the CLOCK algorithm.
//!
//! Every slot of the ring carries a reference bit. Reads set the bit; the
//! insertion sweep clears set bits as the hand passes and evicts the first
//! slot whose bit is already clear.
//!
//! # Concurrency
//! - `get` never takes the ring lock: it reads the sharded index and flips a
//!   single atomic reference bit. Under a concurrent `put` it may report a
//!   stale hit or miss, but never observes torn memory.
//! - `put`, `invalidate`, `clear` and `purge_expired` serialize on the ring
//!   lock, so slot ownership and the index always agree once the lock is
//!   released.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::stats::Counters;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::error::{validate_capacity, validate_ttl, Result};

// == Index Entry ==
/// Index record: the slot owning the key plus the stored entry.
#[derive(Debug)]
struct Indexed<V> {
    slot: usize,
    entry: CacheEntry<V>,
}

// == Ring ==
/// Slot ownership and the sweep position, guarded by the ring lock.
#[derive(Debug)]
struct Ring<K> {
    /// Key owning each slot, None = empty
    slots: Vec<Option<K>>,
    /// Next slot to examine on insertion
    hand: usize,
}

impl<K> Ring<K> {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            hand: 0,
        }
    }
}

// == Clock Cache ==
/// Bounded key/value cache with CLOCK (second-chance) eviction.
///
/// Entries may carry an expiry. A plain `ClockCache` stores entries without
/// one; [`ExpiringClockCache`](crate::cache::ExpiringClockCache) wraps the same
/// engine with a default TTL.
pub struct ClockCache<K, V> {
    /// Authoritative key lookup
    index: DashMap<K, Indexed<V>>,
    /// One reference bit per slot
    ref_bits: Box<[AtomicBool]>,
    ring: Mutex<Ring<K>>,
    counters: Counters,
    capacity: usize,
    /// TTL applied by `put`, None = entries never expire
    default_ttl: Option<Duration>,
}

impl<K, V> ClockCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache with `capacity` slots whose entries never expire.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity)
    /// when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::build(capacity, None)
    }

    /// Creates the engine, validating capacity and (when given) the default TTL.
    pub(crate) fn build(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        let capacity = validate_capacity(capacity)?;
        let default_ttl = default_ttl.map(validate_ttl).transpose()?;

        Ok(Self {
            index: DashMap::with_capacity(capacity),
            ref_bits: (0..capacity).map(|_| AtomicBool::new(false)).collect(),
            ring: Mutex::new(Ring::new(capacity)),
            counters: Counters::default(),
            capacity,
            default_ttl,
        })
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, if present and live.
    ///
    /// A hit marks the slot as recently used. An expired entry counts as a
    /// miss and has its reference bit cleared so the next sweep reclaims it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(indexed) = self.index.get(key) else {
            self.counters.record_miss();
            return None;
        };

        if indexed.entry.is_expired_at(Instant::now()) {
            self.ref_bits[indexed.slot].store(false, Ordering::Relaxed);
            drop(indexed);
            self.counters.record_miss();
            return None;
        }

        self.ref_bits[indexed.slot].store(true, Ordering::Relaxed);
        let value = indexed.entry.value.clone();
        drop(indexed);
        self.counters.record_hit();
        Some(value)
    }

    /// Returns the value stored under `key`, or `default` when absent.
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    // == Put ==
    /// Stores `value` under `key` using the cache's default TTL.
    ///
    /// An existing key is updated in place: its value and expiry are replaced
    /// and its slot is marked referenced, without moving the hand. A new key
    /// claims the slot chosen by the sweep, evicting that slot's previous
    /// owner if any.
    pub fn put(&self, key: K, value: V) {
        self.insert(key, value, self.default_ttl);
    }

    pub(crate) fn insert(&self, key: K, value: V, ttl: Option<Duration>) {
        let mut ring = self.ring.lock();

        if let Some(mut indexed) = self.index.get_mut(&key) {
            indexed.entry.refresh(value, ttl);
            self.ref_bits[indexed.slot].store(true, Ordering::Relaxed);
            return;
        }

        let slot = self.sweep(&ring);

        if let Some(old_key) = ring.slots[slot].take() {
            if self.index.remove(&old_key).is_some() {
                self.counters.record_eviction();
                debug!(slot, "evicted unreferenced entry");
            }
        }

        ring.slots[slot] = Some(key.clone());
        self.index.insert(
            key,
            Indexed {
                slot,
                entry: CacheEntry::new(value, ttl),
            },
        );
        self.ref_bits[slot].store(true, Ordering::Relaxed);
        ring.hand = (slot + 1) % self.capacity;
    }

    // == Sweep ==
    /// Advances the hand to the next victim slot and returns its position.
    ///
    /// Referenced slots get their bit cleared and are skipped. Once half the
    /// ring has been skipped, the slot under the hand is taken regardless of
    /// its bit, which bounds the scan even while readers keep setting bits.
    fn sweep(&self, ring: &Ring<K>) -> usize {
        let mut hand = ring.hand;
        let mut swept = 0usize;

        loop {
            if !self.ref_bits[hand].swap(false, Ordering::Relaxed) {
                return hand;
            }

            hand = (hand + 1) % self.capacity;
            swept += 1;

            if swept * 2 >= self.capacity {
                self.ref_bits[hand].store(false, Ordering::Relaxed);
                trace!(hand, swept, "sweep limit reached, forcing victim");
                return hand;
            }
        }
    }

    // == Invalidate ==
    /// Removes `key` from the cache. Not counted as an eviction.
    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut ring = self.ring.lock();

        if let Some((_, indexed)) = self.index.remove(key) {
            ring.slots[indexed.slot] = None;
            self.ref_bits[indexed.slot].store(false, Ordering::Relaxed);
            debug!(slot = indexed.slot, "invalidated entry");
        }
    }

    // == Clear ==
    /// Empties every slot, rewinds the hand and zeroes the statistics.
    pub fn clear(&self) {
        let mut ring = self.ring.lock();

        self.index.clear();
        ring.slots.iter_mut().for_each(|slot| *slot = None);
        ring.hand = 0;
        for bit in self.ref_bits.iter() {
            bit.store(false, Ordering::Relaxed);
        }
        self.counters.reset();
    }

    // == Purge Expired ==
    /// Reclaims the slots of every expired entry and returns how many were
    /// removed. Purges do not count as evictions.
    pub(crate) fn purge_expired(&self) -> usize {
        let mut ring = self.ring.lock();
        let now = Instant::now();
        let mut freed = Vec::new();

        self.index.retain(|_, indexed| {
            let expired = indexed.entry.is_expired_at(now);
            if expired {
                freed.push(indexed.slot);
            }
            !expired
        });

        for &slot in &freed {
            ring.slots[slot] = None;
            self.ref_bits[slot].store(false, Ordering::Relaxed);
        }

        freed.len()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.index.len(), self.capacity)
    }

    // == Length ==
    /// Returns the number of resident entries, including expired entries
    /// whose slots have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Capacity ==
    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    #[cfg(test)]
    pub(crate) fn hand(&self) -> usize {
        self.ring.lock().hand
    }

    /// Asserts that the index and slot ownership agree.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        let ring = self.ring.lock();
        assert!(ring.hand < self.capacity, "hand out of range");

        let occupied = ring.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.index.len(), "occupied slots != index size");

        for (pos, slot) in ring.slots.iter().enumerate() {
            match slot {
                Some(key) => {
                    let indexed = self.index.get(key).expect("occupied slot missing from index");
                    assert_eq!(indexed.slot, pos, "index points at the wrong slot");
                }
                None => assert!(
                    !self.ref_bits[pos].load(Ordering::Relaxed),
                    "empty slot {pos} is referenced"
                ),
            }
        }
    }
}

impl<K: Eq + Hash, V> fmt::Debug for ClockCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V> Cache<K, V> for ClockCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        ClockCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        ClockCache::put(self, key, value);
    }

    fn invalidate(&self, key: &K) {
        ClockCache::invalidate(self, key);
    }

    fn clear(&self) {
        ClockCache::clear(self);
    }
}
