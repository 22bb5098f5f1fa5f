//! Runtime choice of station search.

use crate::domain::{BoundingBox, FuelStation};

use super::cache::CachedStationSearch;
use super::directory::FixedStationDirectory;
use super::error::FuelSearchError;
use super::overpass::OverpassClient;
use super::search::StationSearch;

/// The station search a server is configured with.
pub enum StationBackend {
    /// Live Overpass lookups behind a TTL cache.
    Overpass(CachedStationSearch<OverpassClient>),
    /// A fixed list loaded at startup.
    Directory(FixedStationDirectory),
}

impl StationBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StationBackend::Overpass(_) => "overpass",
            StationBackend::Directory(_) => "directory",
        }
    }
}

impl StationSearch for StationBackend {
    async fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        match self {
            StationBackend::Overpass(search) => search.search(bbox, limit).await,
            StationBackend::Directory(search) => search.search(bbox, limit).await,
        }
    }
}
