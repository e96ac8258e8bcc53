//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::hash::Hash;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{ClockCache, ExpiringClockCache};
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults, or deserialized as part of a host application's config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of slots in the cache
    pub capacity: usize,
    /// Default TTL in seconds; None builds caches whose entries never expire
    pub default_ttl_secs: Option<u64>,
    /// Interval in seconds between background purge runs
    pub purge_interval_secs: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLOCK_CACHE_CAPACITY` - Number of slots (default: 1000)
    /// - `CLOCK_CACHE_DEFAULT_TTL` - Default TTL in seconds (default: unset)
    /// - `CLOCK_CACHE_PURGE_INTERVAL` - Purge frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("CLOCK_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            default_ttl_secs: env::var("CLOCK_CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.default_ttl_secs),
            purge_interval_secs: env::var("CLOCK_CACHE_PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval_secs),
        }
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }

    /// Builds a CLOCK cache with the configured capacity. The TTL is ignored.
    pub fn build_clock<K, V>(&self) -> Result<ClockCache<K, V>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        ClockCache::new(self.capacity)
    }

    /// Builds an expiring CLOCK cache.
    ///
    /// # Errors
    /// Fails with [`CacheError::InvalidTtl`] when no default TTL is
    /// configured, or it is zero, and with
    /// [`CacheError::InvalidCapacity`] when the capacity is zero.
    pub fn build_expiring<K, V>(&self) -> Result<ExpiringClockCache<K, V>>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let ttl = self
            .default_ttl()
            .ok_or(CacheError::InvalidTtl(Duration::ZERO))?;
        ExpiringClockCache::new(self.capacity, ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl_secs: None,
            purge_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl_secs, None);
        assert_eq!(config.purge_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment, so no cross-test races.
        env::remove_var("CLOCK_CACHE_CAPACITY");
        env::remove_var("CLOCK_CACHE_DEFAULT_TTL");
        env::remove_var("CLOCK_CACHE_PURGE_INTERVAL");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("CLOCK_CACHE_CAPACITY", "64");
        env::set_var("CLOCK_CACHE_DEFAULT_TTL", "30");
        env::set_var("CLOCK_CACHE_PURGE_INTERVAL", "not-a-number");
        let config = CacheConfig::from_env();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.default_ttl(), Some(Duration::from_secs(30)));
        assert_eq!(config.purge_interval_secs, 60);

        env::remove_var("CLOCK_CACHE_CAPACITY");
        env::remove_var("CLOCK_CACHE_DEFAULT_TTL");
        env::remove_var("CLOCK_CACHE_PURGE_INTERVAL");
    }

    #[test]
    fn test_build_caches() {
        let config = CacheConfig {
            capacity: 16,
            default_ttl_secs: Some(5),
            purge_interval_secs: 1,
        };

        let clock = config.build_clock::<String, u32>().unwrap();
        assert_eq!(clock.capacity(), 16);

        let expiring = config.build_expiring::<String, u32>().unwrap();
        assert_eq!(expiring.default_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn test_build_surfaces_construction_errors() {
        let config = CacheConfig {
            capacity: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.build_clock::<String, u32>(),
            Err(CacheError::InvalidCapacity(0))
        ));

        let config = CacheConfig::default();
        assert!(matches!(
            config.build_expiring::<String, u32>(),
            Err(CacheError::InvalidTtl(_))
        ));

        let config = CacheConfig {
            default_ttl_secs: Some(0),
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.build_expiring::<String, u32>(),
            Err(CacheError::InvalidTtl(_))
        ));
    }
}
