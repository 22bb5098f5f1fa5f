//! Fuel station points of interest.

use super::GeoPoint;

/// Name given to stations the collaborator returns without one.
pub const DEFAULT_STATION_NAME: &str = "Fuel Station";

/// A fuel station located by the search collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelStation {
    pub location: GeoPoint,
    pub name: String,
}

impl FuelStation {
    /// Create a station. A blank name falls back to [`DEFAULT_STATION_NAME`].
    pub fn new(location: GeoPoint, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_STATION_NAME.to_string()
        } else {
            name
        };
        Self { location, name }
    }

    /// Deduplication key: the station's coordinates rounded to 0.001°.
    pub fn dedup_key(&self) -> (i64, i64) {
        self.location.grid_key()
    }
}
