//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the CLOCK cache against random operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{ClockCache, UnboundedCache};

// == Test Configuration ==
const TEST_CAPACITY: usize = 8;

// == Strategies ==
/// Small key space so sequences revisit keys and force evictions.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-p]".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Capacity bound: resident keys never exceed the number of slots, and the
    // index always agrees with slot ownership.
    #[test]
    fn prop_capacity_bound(
        capacity in 1usize..=TEST_CAPACITY,
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let cache = ClockCache::new(capacity).unwrap();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => cache.put(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
                CacheOp::Invalidate { key } => cache.invalidate(&key),
            }
            prop_assert!(
                cache.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                cache.len(),
                capacity
            );
            cache.validate_invariants();
        }
    }

    // Counter correctness: hits + misses == lookups, and they match what the
    // caller observed.
    #[test]
    fn prop_counter_correctness(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let cache = ClockCache::new(TEST_CAPACITY).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => cache.put(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { key } => cache.invalidate(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.lookups, expected_hits + expected_misses, "Lookups mismatch");
        prop_assert_eq!(stats.entries, cache.len(), "Entries mismatch");
    }

    // Every resident key maps to the value last put under it. The CLOCK cache
    // may forget keys, but never returns a stale or foreign value.
    #[test]
    fn prop_resident_values_are_latest(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let cache = ClockCache::new(TEST_CAPACITY).unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    model.insert(key.clone(), value);
                    cache.put(key, value);
                }
                CacheOp::Get { key } => {
                    if let Some(value) = cache.get(&key) {
                        prop_assert_eq!(Some(&value), model.get(&key));
                    }
                }
                CacheOp::Invalidate { key } => {
                    model.remove(&key);
                    cache.invalidate(&key);
                }
            }
        }
    }

    // Hit after put: the key just written is always readable.
    #[test]
    fn prop_hit_after_put(
        ops in prop::collection::vec(cache_op_strategy(), 0..50),
        key in key_strategy(),
        value in any::<u32>()
    ) {
        let cache = ClockCache::new(TEST_CAPACITY).unwrap();
        for op in ops {
            if let CacheOp::Put { key, value } = op {
                cache.put(key, value);
            }
        }

        cache.put(key.clone(), value);
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // With more slots than distinct keys and no invalidation, nothing is ever
    // evicted and the CLOCK cache behaves like a plain map.
    #[test]
    fn prop_matches_unbounded_when_large(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let clock = ClockCache::new(64).unwrap();
        let unbounded = UnboundedCache::new();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    clock.put(key.clone(), value);
                    unbounded.put(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(clock.get(&key), unbounded.get(&key));
                }
                // Skipped: freed slots let the hand wrap and evict.
                CacheOp::Invalidate { .. } => {}
            }
        }

        prop_assert_eq!(clock.len(), unbounded.len());
        prop_assert_eq!(clock.stats().evictions, 0);
    }
}
