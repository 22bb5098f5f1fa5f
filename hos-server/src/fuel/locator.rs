//! Fuel station proximity search along a trip.
//!
//! Two modes: one small box around each sampled route waypoint, or one
//! padded box spanning the trip's endpoints when no geometry is known.
//! Waypoint lookups are independent, so they run through a bounded,
//! order-preserving pool; merging in waypoint order keeps the result
//! deterministic for a given collaborator.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::{BoundingBox, FuelStation, GeoPoint};
use crate::route::{DEFAULT_SAMPLE_SPACING_KM, decode_polyline, sample_waypoints};

use super::search::StationSearch;

/// Configuration for station lookups.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Spacing between sampled route waypoints (km).
    pub sample_spacing_km: f64,

    /// Half-width of the search box around each waypoint (km).
    pub radius_km: f64,

    /// Stations requested per waypoint box.
    pub per_waypoint_limit: usize,

    /// Stations requested for an endpoint-spanning box.
    pub bbox_limit: usize,

    /// Stop accumulating once more than this many unique stations are found.
    pub max_stations: usize,

    /// Endpoint-box mode only applies to trips longer than this (miles).
    pub min_bbox_distance_miles: f64,

    /// Maximum lookups in flight at once.
    pub concurrency: usize,

    /// Per-lookup timeout; a lookup that overruns counts as empty.
    pub lookup_timeout: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            sample_spacing_km: DEFAULT_SAMPLE_SPACING_KM,
            radius_km: 10.0,
            per_waypoint_limit: 10,
            bbox_limit: 200,
            max_stations: 100,
            min_bbox_distance_miles: 50.0,
            concurrency: 4,
            lookup_timeout: Duration::from_secs(30),
        }
    }
}

/// Stations kept in first-seen order, one per ~111 m grid cell.
#[derive(Debug, Default)]
struct StationSet {
    seen: HashSet<(i64, i64)>,
    stations: Vec<FuelStation>,
}

impl StationSet {
    fn extend(&mut self, found: impl IntoIterator<Item = FuelStation>) {
        for station in found {
            if self.seen.insert(station.dedup_key()) {
                self.stations.push(station);
            }
        }
    }

    fn len(&self) -> usize {
        self.stations.len()
    }
}

/// Drop stations whose coordinates round (to 0.001°) onto an earlier one.
pub fn dedup_stations(stations: impl IntoIterator<Item = FuelStation>) -> Vec<FuelStation> {
    let mut set = StationSet::default();
    set.extend(stations);
    set.stations
}

/// Finds fuel stations near a trip using a [`StationSearch`] collaborator.
pub struct FuelStationLocator<S> {
    search: S,
    config: LocatorConfig,
}

impl<S: StationSearch> FuelStationLocator<S> {
    pub fn new(search: S, config: LocatorConfig) -> Self {
        Self { search, config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Stations along an encoded route.
    ///
    /// An undecodable polyline yields no stations.
    pub async fn near_route(&self, polyline: &str) -> Vec<FuelStation> {
        let points = decode_polyline(polyline);
        if points.is_empty() {
            warn!("route polyline did not decode, continuing without stations");
            return Vec::new();
        }
        let waypoints = sample_waypoints(&points, self.config.sample_spacing_km);
        debug!(
            points = points.len(),
            waypoints = waypoints.len(),
            "sampled route waypoints"
        );
        self.near_waypoints(&waypoints).await
    }

    /// Stations within `radius_km` of each waypoint.
    pub async fn near_waypoints(&self, waypoints: &[GeoPoint]) -> Vec<FuelStation> {
        let radius_km = self.config.radius_km;
        let limit = self.config.per_waypoint_limit;

        let mut lookups = stream::iter(waypoints.iter().copied())
            .map(|point| self.lookup(BoundingBox::around(&point, radius_km), limit))
            .buffered(self.config.concurrency.max(1));

        let mut found = StationSet::default();
        let mut queried = 0;
        while let Some(batch) = lookups.next().await {
            queried += 1;
            found.extend(batch);
            if found.len() > self.config.max_stations {
                debug!(
                    queried,
                    stations = found.len(),
                    "station cap reached, skipping remaining waypoints"
                );
                break;
            }
        }

        found.stations
    }

    /// Stations inside a box spanning both endpoints.
    pub async fn between(&self, from: &GeoPoint, to: &GeoPoint) -> Vec<FuelStation> {
        let bbox = BoundingBox::spanning(from, to);
        dedup_stations(self.lookup(bbox, self.config.bbox_limit).await)
    }

    /// One collaborator call; failures and timeouts degrade to empty.
    async fn lookup(&self, bbox: BoundingBox, limit: usize) -> Vec<FuelStation> {
        let lookup = self.search.search(bbox, limit);
        match tokio::time::timeout(self.config.lookup_timeout, lookup).await {
            Ok(Ok(stations)) => stations,
            Ok(Err(e)) => {
                warn!(?bbox, error = %e, "fuel station lookup failed, using empty");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    ?bbox,
                    timeout_ms = self.config.lookup_timeout.as_millis() as u64,
                    "fuel station lookup timed out, using empty"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::{FixedStationDirectory, FuelSearchError};
    use crate::route::encode_polyline;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn station(lat: f64, lng: f64, name: &str) -> FuelStation {
        FuelStation::new(point(lat, lng), name)
    }

    /// Fails for boxes north of `fail_north_of`, never answers if `hang`.
    struct FlakySearch {
        directory: FixedStationDirectory,
        fail_north_of: f64,
        hang: bool,
        calls: AtomicUsize,
    }

    impl StationSearch for FlakySearch {
        async fn search(
            &self,
            bbox: BoundingBox,
            limit: usize,
        ) -> Result<Vec<FuelStation>, FuelSearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if bbox.south > self.fail_north_of {
                return Err(FuelSearchError::Api {
                    status: 504,
                    message: "Gateway Timeout".into(),
                });
            }
            self.directory.search(bbox, limit).await
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let stations = vec![
            station(40.71281, -74.00601, "First"),
            station(40.71289, -74.00609, "Duplicate"),
            station(40.7200, -74.0060, "Other"),
        ];
        let names: Vec<_> = dedup_stations(stations)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["First", "Other"]);
    }

    #[tokio::test]
    async fn waypoint_results_merge_in_waypoint_order() {
        let directory = FixedStationDirectory::new(vec![
            station(32.0, -97.0, "South"),
            station(33.0, -97.0, "Middle"),
            station(33.0001, -97.0001, "Middle duplicate"),
            station(34.0, -97.0, "North"),
        ]);
        let locator = FuelStationLocator::new(directory, LocatorConfig::default());
        let waypoints = [point(34.0, -97.0), point(33.0, -97.0), point(32.0, -97.0)];

        let names: Vec<_> = locator
            .near_waypoints(&waypoints)
            .await
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["North", "Middle", "South"]);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn waypoint_search_future_is_send() {
        let locator =
            FuelStationLocator::new(FixedStationDirectory::default(), LocatorConfig::default());
        let waypoints = [point(30.0, -90.0)];
        let lookups = locator.near_waypoints(&waypoints);
        assert_send(&lookups);
        let route = locator.near_route("_p~iF~ps|U");
        assert_send(&route);
    }

    #[tokio::test]
    async fn failed_lookups_degrade_to_empty() {
        let search = FlakySearch {
            directory: FixedStationDirectory::new(vec![
                station(30.0, -90.0, "Kept"),
                station(31.0, -90.0, "Lost"),
            ]),
            fail_north_of: 30.5,
            hang: false,
            calls: AtomicUsize::new(0),
        };
        let locator = FuelStationLocator::new(search, LocatorConfig::default());

        let found = locator
            .near_waypoints(&[point(30.0, -90.0), point(31.0, -90.0)])
            .await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Kept");
    }

    #[tokio::test]
    async fn slow_lookups_time_out() {
        let search = FlakySearch {
            directory: FixedStationDirectory::default(),
            fail_north_of: 90.0,
            hang: true,
            calls: AtomicUsize::new(0),
        };
        let config = LocatorConfig {
            lookup_timeout: Duration::from_millis(20),
            ..LocatorConfig::default()
        };
        let locator = FuelStationLocator::new(search, config);

        let found = locator.near_waypoints(&[point(10.0, 10.0), point(11.0, 10.0)]).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn stops_after_station_cap() {
        // Each waypoint box holds three distinct stations.
        let mut stations = Vec::new();
        for i in 0..10 {
            let lat = 20.0 + f64::from(i);
            for j in 0..3 {
                stations.push(station(lat, 0.01 * f64::from(j), "S"));
            }
        }
        let search = Arc::new(FlakySearch {
            directory: FixedStationDirectory::new(stations),
            fail_north_of: 90.0,
            hang: false,
            calls: AtomicUsize::new(0),
        });
        let config = LocatorConfig {
            max_stations: 4,
            concurrency: 1,
            ..LocatorConfig::default()
        };
        let locator = FuelStationLocator::new(search.clone(), config);
        let waypoints: Vec<_> = (0..10).map(|i| point(20.0 + f64::from(i), 0.0)).collect();

        let found = locator.near_waypoints(&waypoints).await;
        // Cap of 4 is exceeded after the second waypoint (6 stations).
        assert_eq!(found.len(), 6);
        assert!(search.calls.load(Ordering::SeqCst) < waypoints.len());
    }

    #[tokio::test]
    async fn near_route_samples_then_searches() {
        let route: Vec<_> = (0..=20)
            .map(|i| point(35.0 + f64::from(i) * 0.1, -97.0))
            .collect();
        let directory = FixedStationDirectory::new(vec![
            station(35.0, -97.0, "Start"),
            station(36.0, -97.0, "Mid"),
            station(37.0, -97.0, "End"),
        ]);
        let locator = FuelStationLocator::new(directory, LocatorConfig::default());

        let names: Vec<_> = locator
            .near_route(&encode_polyline(&route))
            .await
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Start", "Mid", "End"]);
    }

    #[tokio::test]
    async fn undecodable_route_has_no_stations() {
        let directory = FixedStationDirectory::new(vec![station(35.0, -97.0, "A")]);
        let locator = FuelStationLocator::new(directory, LocatorConfig::default());
        assert!(locator.near_route("_p~iF~ps|").await.is_empty());
    }

    #[tokio::test]
    async fn between_endpoints_uses_padded_box() {
        let directory = FixedStationDirectory::new(vec![
            station(40.5, -87.0, "Inside"),
            station(42.1, -87.6, "In padding"),
            station(45.0, -80.0, "Outside"),
        ]);
        let locator = FuelStationLocator::new(directory, LocatorConfig::default());

        let found = locator
            .between(&point(41.88, -87.63), &point(39.77, -86.16))
            .await;
        let names: Vec<_> = found.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Inside", "In padding"]);
    }
}
