//! Caching layer in front of a station search collaborator.
//!
//! Repeated plans along the same corridor issue the same waypoint
//! boxes. Keys round each bbox edge to 0.001° so boxes that differ only
//! by floating-point noise share an entry. Failed lookups are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{BoundingBox, FuelStation};

use super::error::FuelSearchError;
use super::search::StationSearch;

/// Cache key: rounded (south, west, north, east) plus the result limit.
type SearchKey = (i64, i64, i64, i64, usize);

/// Configuration for the station cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

fn search_key(bbox: &BoundingBox, limit: usize) -> SearchKey {
    let r = |deg: f64| (deg * 1000.0).round() as i64;
    (r(bbox.south), r(bbox.west), r(bbox.north), r(bbox.east), limit)
}

/// Station search with caching.
///
/// Wraps any [`StationSearch`] and caches successful results.
pub struct CachedStationSearch<S> {
    inner: S,
    cache: MokaCache<SearchKey, Arc<Vec<FuelStation>>>,
}

impl<S: StationSearch> CachedStationSearch<S> {
    /// Create a new cached search.
    pub fn new(inner: S, config: &StationCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: StationSearch> StationSearch for CachedStationSearch<S> {
    async fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        let key = search_key(&bbox, limit);

        // Try cache first
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let stations = self.inner.search(bbox, limit).await?;
        self.cache.insert(key, Arc::new(stations.clone())).await;
        Ok(stations)
    }
}
