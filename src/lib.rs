//! Clock Cache - bounded in-memory caches
//!
//! Provides a CLOCK (pseudo-LRU) cache with optional TTL expiration, plus
//! unbounded map-backed caches behind the same [`Cache`] trait.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    Cache, CacheStats, ClockCache, ExpiringCache, ExpiringClockCache, UnboundedCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_purge_task;
