//! Fixed in-memory station directory.
//!
//! Stands in for the live search API in tests and offline deployments.
//! Can be loaded from a JSON array of `{"lat", "lng", "name"}` records.

use std::path::Path;

use serde::Deserialize;

use crate::domain::{BoundingBox, FuelStation, GeoPoint};

use super::error::FuelSearchError;
use super::search::StationSearch;

/// On-disk station record.
#[derive(Debug, Deserialize)]
struct StationRecord {
    lat: f64,
    lng: f64,
    #[serde(default)]
    name: String,
}

/// A station search over a fixed list.
#[derive(Debug, Clone, Default)]
pub struct FixedStationDirectory {
    stations: Vec<FuelStation>,
}

impl FixedStationDirectory {
    pub fn new(stations: Vec<FuelStation>) -> Self {
        Self { stations }
    }

    /// Load a directory from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FuelSearchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FuelSearchError::Directory {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    /// Parse a directory from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FuelSearchError> {
        let records: Vec<StationRecord> =
            serde_json::from_str(json).map_err(|e| FuelSearchError::Json {
                message: e.to_string(),
            })?;

        let stations = records
            .into_iter()
            .map(|r| {
                GeoPoint::new(r.lat, r.lng)
                    .map(|location| FuelStation::new(location, r.name))
                    .map_err(|e| FuelSearchError::Directory {
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { stations })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationSearch for FixedStationDirectory {
    async fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        Ok(self
            .stations
            .iter()
            .filter(|s| bbox.contains(&s.location))
            .take(limit)
            .cloned()
            .collect())
    }
}
