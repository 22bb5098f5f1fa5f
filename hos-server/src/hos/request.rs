//! Trip planning requests.

use crate::domain::{GeoPoint, Timestamp};

use super::error::PlanError;

/// Default assumed pickup/dropoff/fuel durations (minutes).
pub const DEFAULT_HANDLING_MINS: i64 = 60;

/// Longest pickup, dropoff or fuel stop a request may assume (minutes).
pub const MAX_HANDLING_MINS: i64 = 24 * 60;

/// Default miles between fuel stops.
pub const DEFAULT_FUEL_INTERVAL_MILES: i64 = 1000;

/// Everything known about a trip before planning.
///
/// Negative durations and hours are clamped to zero when planning;
/// non-finite numbers are rejected by [`TripRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub start: Timestamp,
    pub total_drive_minutes: i64,
    /// On-duty hours already used in the current rolling cycle.
    pub cycle_hours_used: f64,
    pub distance_miles: Option<f64>,
    pub current_location: Option<GeoPoint>,
    pub pickup_location: Option<GeoPoint>,
    pub dropoff_location: Option<GeoPoint>,
    /// Encoded route geometry, if the caller has one.
    pub route_polyline: Option<String>,
    pub fuel_interval_miles: i64,
    pub allow_restart: bool,
    pub pickup_minutes: i64,
    pub dropoff_minutes: i64,
    pub fuel_stop_minutes: i64,
}

impl TripRequest {
    /// A request with default handling times and no route information.
    pub fn new(start: Timestamp, total_drive_minutes: i64) -> Self {
        Self {
            start,
            total_drive_minutes,
            cycle_hours_used: 0.0,
            distance_miles: None,
            current_location: None,
            pickup_location: None,
            dropoff_location: None,
            route_polyline: None,
            fuel_interval_miles: DEFAULT_FUEL_INTERVAL_MILES,
            allow_restart: false,
            pickup_minutes: DEFAULT_HANDLING_MINS,
            dropoff_minutes: DEFAULT_HANDLING_MINS,
            fuel_stop_minutes: DEFAULT_HANDLING_MINS,
        }
    }

    pub fn with_cycle_hours_used(mut self, hours: f64) -> Self {
        self.cycle_hours_used = hours;
        self
    }

    pub fn with_distance_miles(mut self, miles: f64) -> Self {
        self.distance_miles = Some(miles);
        self
    }

    pub fn with_route_polyline(mut self, polyline: impl Into<String>) -> Self {
        self.route_polyline = Some(polyline.into());
        self
    }

    pub fn with_endpoints(mut self, pickup: GeoPoint, dropoff: GeoPoint) -> Self {
        self.pickup_location = Some(pickup);
        self.dropoff_location = Some(dropoff);
        self
    }

    pub fn with_current_location(mut self, location: GeoPoint) -> Self {
        self.current_location = Some(location);
        self
    }

    pub fn with_fuel_interval_miles(mut self, miles: i64) -> Self {
        self.fuel_interval_miles = miles;
        self
    }

    pub fn with_restart(mut self, allow: bool) -> Self {
        self.allow_restart = allow;
        self
    }

    pub fn with_handling_minutes(mut self, pickup: i64, dropoff: i64, fuel_stop: i64) -> Self {
        self.pickup_minutes = pickup;
        self.dropoff_minutes = dropoff;
        self.fuel_stop_minutes = fuel_stop;
        self
    }

    /// Reject requests that cannot be planned.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.cycle_hours_used.is_finite() {
            return Err(PlanError::InvalidInput(
                "cycle_hours_used must be a finite number".to_string(),
            ));
        }

        if self.distance_miles.is_some_and(|d| !d.is_finite()) {
            return Err(PlanError::InvalidInput(
                "distance_miles must be a finite number".to_string(),
            ));
        }

        for (field, mins) in [
            ("pickup_minutes", self.pickup_minutes),
            ("dropoff_minutes", self.dropoff_minutes),
            ("fuel_stop_minutes", self.fuel_stop_minutes),
        ] {
            if mins > MAX_HANDLING_MINS {
                return Err(PlanError::InvalidInput(format!(
                    "{field} must be at most {MAX_HANDLING_MINS} minutes"
                )));
            }
        }

        // Soft decoding covers truncated geometry; text outside the
        // polyline alphabet is not geometry at all.
        if let Some(polyline) = &self.route_polyline {
            if !polyline.bytes().all(|b| (63..=126).contains(&b)) {
                return Err(PlanError::InvalidInput(
                    "route_polyline contains characters outside the polyline alphabet".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Drive minutes to plan, clamped to zero.
    pub fn drive_minutes(&self) -> i64 {
        self.total_drive_minutes.max(0)
    }

    /// Fuel stops a trip of this distance should need.
    pub fn fuel_stops_expected(&self) -> u32 {
        match self.distance_miles {
            Some(distance) if distance > 0.0 && self.fuel_interval_miles > 0 => {
                (distance / self.fuel_interval_miles as f64).floor() as u32
            }
            _ => 0,
        }
    }

    /// Where the trip starts: the pickup, else the driver's current location.
    pub fn origin(&self) -> Option<GeoPoint> {
        self.pickup_location.or(self.current_location)
    }
}
