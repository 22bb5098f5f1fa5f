//! Fuel station lookup.
//!
//! [`StationSearch`] is the seam to the external geocoding service.
//! [`OverpassClient`] talks to OpenStreetMap's Overpass API and
//! [`FixedStationDirectory`] serves a fixed list. [`CachedStationSearch`]
//! memoizes either; [`StationBackend`] picks one at startup.
//! [`FuelStationLocator`] turns a trip into lookups and merges the answers.

mod backend;
mod cache;
mod directory;
mod error;
mod locator;
mod overpass;
mod search;

pub use backend::StationBackend;
pub use cache::{CachedStationSearch, StationCacheConfig};
pub use directory::FixedStationDirectory;
pub use error::FuelSearchError;
pub use locator::{FuelStationLocator, LocatorConfig, dedup_stations};
pub use overpass::{OverpassClient, OverpassConfig, fuel_query, parse_response};
pub use search::StationSearch;
