//! Geographic coordinates and bounding boxes.
//!
//! Distances here are a planar approximation (111 km per degree, longitude
//! scaled by the cosine of latitude). That is good enough for spacing
//! waypoints and building search boxes a few kilometres wide; nothing in
//! this crate needs geodesic accuracy.

use std::fmt;

/// Kilometres per degree of latitude in the planar approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidGeoPoint {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS-84 latitude/longitude pair in degrees.
///
/// Always finite and within range, so a `GeoPoint` can be handed to a
/// search collaborator without further checks.
///
/// # Examples
///
/// ```
/// use hos_server::domain::GeoPoint;
///
/// let chicago = GeoPoint::new(41.8781, -87.6298).unwrap();
/// assert_eq!(chicago.latitude(), 41.8781);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidGeoPoint> {
        let reject = |reason| InvalidGeoPoint {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(reject("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(reject("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(reject("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Planar distance in kilometres from `previous` to this point.
    ///
    /// The longitude delta is scaled by the cosine of this point's latitude.
    pub fn planar_km_from(&self, previous: &GeoPoint) -> f64 {
        let dx = (self.longitude - previous.longitude)
            * KM_PER_DEGREE
            * self.latitude.to_radians().cos();
        let dy = (self.latitude - previous.latitude) * KM_PER_DEGREE;
        (dx * dx + dy * dy).sqrt()
    }

    /// Key identifying the ~111 m grid cell this point falls in.
    ///
    /// Coordinates are rounded to three decimal places.
    pub fn grid_key(&self) -> (i64, i64) {
        (
            (self.latitude * 1000.0).round() as i64,
            (self.longitude * 1000.0).round() as i64,
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// An axis-aligned box in degrees, used as a search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Minimum padding, in degrees, applied by [`BoundingBox::spanning`].
    pub const MIN_PADDING_DEG: f64 = 0.01;

    /// Fraction of the span added on each side by [`BoundingBox::spanning`].
    pub const SPAN_PADDING: f64 = 0.2;

    /// A square box centred on `center` reaching `radius_km` in each direction.
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let delta = radius_km.max(0.0) / KM_PER_DEGREE;
        Self {
            south: center.latitude - delta,
            west: center.longitude - delta,
            north: center.latitude + delta,
            east: center.longitude + delta,
        }
    }

    /// A box covering both points, padded on every side by
    /// `max(0.01°, 20% of the span)` per axis.
    pub fn spanning(a: &GeoPoint, b: &GeoPoint) -> Self {
        let lat_min = a.latitude.min(b.latitude);
        let lat_max = a.latitude.max(b.latitude);
        let lng_min = a.longitude.min(b.longitude);
        let lng_max = a.longitude.max(b.longitude);

        let lat_pad = Self::MIN_PADDING_DEG.max((lat_max - lat_min) * Self::SPAN_PADDING);
        let lng_pad = Self::MIN_PADDING_DEG.max((lng_max - lng_min) * Self::SPAN_PADDING);

        Self {
            south: lat_min - lat_pad,
            west: lng_min - lng_pad,
            north: lat_max + lat_pad,
            east: lng_max + lng_pad,
        }
    }

    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}
