//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Activity, DaySchedule, FuelStation, GeoPoint, PlanWarning, TripPlan, TripSummary,
    format_timestamp, parse_timestamp,
};
use crate::hos::{
    DEFAULT_FUEL_INTERVAL_MILES, DEFAULT_HANDLING_MINS, PlanError, TripRequest,
};

fn default_fuel_interval() -> i64 {
    DEFAULT_FUEL_INTERVAL_MILES
}

fn default_handling() -> i64 {
    DEFAULT_HANDLING_MINS
}

/// A location as sent by clients.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
}

impl TryFrom<LocationDto> for GeoPoint {
    type Error = PlanError;

    fn try_from(loc: LocationDto) -> Result<Self, Self::Error> {
        Ok(GeoPoint::new(loc.lat, loc.lng)?)
    }
}

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    /// RFC 3339 start time; its offset decides calendar dates
    pub start: String,

    pub total_drive_minutes: i64,

    #[serde(default)]
    pub cycle_hours_used: f64,

    pub distance_miles: Option<f64>,

    pub current_location: Option<LocationDto>,

    pub pickup_location: Option<LocationDto>,

    pub dropoff_location: Option<LocationDto>,

    /// Encoded route geometry
    pub route_polyline: Option<String>,

    #[serde(default = "default_fuel_interval")]
    pub fuel_interval_miles: i64,

    #[serde(default)]
    pub allow_restart: bool,

    #[serde(default = "default_handling")]
    pub assume_pickup_minutes: i64,

    #[serde(default = "default_handling")]
    pub assume_dropoff_minutes: i64,

    #[serde(default = "default_handling")]
    pub fuel_stop_minutes: i64,
}

fn location(loc: Option<LocationDto>) -> Result<Option<GeoPoint>, PlanError> {
    loc.map(GeoPoint::try_from).transpose()
}

impl TryFrom<PlanTripRequest> for TripRequest {
    type Error = PlanError;

    fn try_from(req: PlanTripRequest) -> Result<Self, Self::Error> {
        let start = parse_timestamp(&req.start)?;

        let mut request = TripRequest::new(start, req.total_drive_minutes)
            .with_cycle_hours_used(req.cycle_hours_used)
            .with_fuel_interval_miles(req.fuel_interval_miles)
            .with_restart(req.allow_restart)
            .with_handling_minutes(
                req.assume_pickup_minutes,
                req.assume_dropoff_minutes,
                req.fuel_stop_minutes,
            );
        request.distance_miles = req.distance_miles;
        request.current_location = location(req.current_location)?;
        request.pickup_location = location(req.pickup_location)?;
        request.dropoff_location = location(req.dropoff_location)?;
        request.route_polyline = req.route_polyline.filter(|p| !p.trim().is_empty());

        Ok(request)
    }
}

/// A fuel station attached to a stop.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl StationResult {
    pub fn from_station(station: &FuelStation) -> Self {
        Self {
            lat: station.location.latitude(),
            lng: station.location.longitude(),
            name: station.name.clone(),
        }
    }
}

/// One activity on the log.
#[derive(Debug, Serialize)]
pub struct ActivityResult {
    pub start: String,
    pub end: String,

    /// Duty status: `OffDuty`, `Driving` or `OnDuty`
    pub status: &'static str,

    #[serde(rename = "type")]
    pub kind: &'static str,

    pub note: String,

    pub minutes: i64,

    /// Where a fuel stop happens, when a station was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<StationResult>,
}

impl ActivityResult {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            start: format_timestamp(&activity.start()),
            end: format_timestamp(&activity.end()),
            status: activity.status().as_str(),
            kind: activity.kind().as_str(),
            note: activity.note().to_string(),
            minutes: activity.minutes(),
            location: activity.station().map(StationResult::from_station),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WarningResult {
    pub message: String,
    pub blocking: bool,
}

impl WarningResult {
    pub fn from_warning(warning: &PlanWarning) -> Self {
        Self {
            message: warning.to_string(),
            blocking: warning.is_blocking(),
        }
    }
}

/// Paper-log totals for one day.
#[derive(Debug, Serialize)]
pub struct DayTotals {
    pub driving_minutes: i64,
    pub on_duty_minutes: i64,
    pub off_duty_minutes: i64,
}

/// One planned duty window or restart.
#[derive(Debug, Serialize)]
pub struct DayResult {
    /// Calendar date (YYYY-MM-DD) in the trip's offset
    pub date: String,
    pub activities: Vec<ActivityResult>,
    pub warnings: Vec<WarningResult>,
    pub remaining_cycle_hours: f64,
    pub drive_consumed_minutes: i64,
    pub fuel_stops_inserted: u32,
    pub totals: DayTotals,
}

impl DayResult {
    pub fn from_day(day: &DaySchedule) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            activities: day
                .activities
                .iter()
                .map(ActivityResult::from_activity)
                .collect(),
            warnings: day.warnings.iter().map(WarningResult::from_warning).collect(),
            remaining_cycle_hours: day.remaining_cycle_hours,
            drive_consumed_minutes: day.drive_consumed_minutes,
            fuel_stops_inserted: day.fuel_stops_inserted,
            totals: DayTotals {
                driving_minutes: day.driving_minutes(),
                on_duty_minutes: day.on_duty_minutes(),
                off_duty_minutes: day.off_duty_minutes(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TripSummaryResult {
    pub requested_drive_minutes: i64,

    /// Non-zero means the plan stopped early; see `warnings`
    pub remaining_drive_minutes: i64,

    pub days_planned: usize,
    pub fuel_stops_expected: u32,
    pub fuel_stops_inserted: u32,
    pub complete: bool,
    pub warnings: Vec<WarningResult>,
}

impl TripSummaryResult {
    pub fn from_summary(summary: &TripSummary) -> Self {
        Self {
            requested_drive_minutes: summary.requested_drive_minutes,
            remaining_drive_minutes: summary.remaining_drive_minutes,
            days_planned: summary.days_planned,
            fuel_stops_expected: summary.fuel_stops_expected,
            fuel_stops_inserted: summary.fuel_stops_inserted,
            complete: summary.remaining_drive_minutes == 0,
            warnings: summary
                .warnings
                .iter()
                .map(WarningResult::from_warning)
                .collect(),
        }
    }
}

/// Response for trip planning.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    pub days: Vec<DayResult>,
    pub trip_summary: TripSummaryResult,
}

impl PlanTripResponse {
    pub fn from_plan(plan: &TripPlan) -> Self {
        Self {
            days: plan.days.iter().map(DayResult::from_day).collect(),
            trip_summary: TripSummaryResult::from_summary(&plan.summary),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
