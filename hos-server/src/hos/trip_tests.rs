//! Tests for multi-day trip planning.

use super::*;
use crate::domain::{
    ActivityKind, BoundingBox, DaySchedule, FuelStation, GeoPoint, PlanWarning, Timestamp,
    TripPlan, TruncationCause, parse_timestamp,
};
use crate::fuel::{
    FixedStationDirectory, FuelSearchError, FuelStationLocator, LocatorConfig, StationSearch,
};
use crate::route::encode_polyline;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn ts(s: &str) -> Timestamp {
    parse_timestamp(s).unwrap()
}

fn start() -> Timestamp {
    ts("2024-01-01T06:00:00Z")
}

fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

fn station(lat: f64, lng: f64, name: &str) -> FuelStation {
    FuelStation::new(point(lat, lng), name)
}

fn plan(request: &TripRequest) -> TripPlan {
    schedule_trip(request, &[], &PlannerConfig::default())
}

fn plan_with_limits(request: &TripRequest, limits: SafetyLimits) -> TripPlan {
    let config = PlannerConfig::default().with_limits(limits);
    schedule_trip(request, &[], &config)
}

fn shape(day: &DaySchedule) -> Vec<(ActivityKind, i64)> {
    day.activities
        .iter()
        .map(|a| (a.kind(), a.minutes()))
        .collect()
}

fn fuel_stop_names(plan: &TripPlan) -> Vec<Option<String>> {
    plan.activities()
        .filter(|a| a.kind() == ActivityKind::FuelStop)
        .map(|a| a.station().map(|s| s.name.clone()))
        .collect()
}

fn planner<S: StationSearch>(search: S) -> TripPlanner<S> {
    TripPlanner::new(
        FuelStationLocator::new(search, LocatorConfig::default()),
        PlannerConfig::default(),
    )
}

/// Never answers.
struct HangingSearch;

impl StationSearch for HangingSearch {
    async fn search(
        &self,
        _bbox: BoundingBox,
        _limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        std::future::pending().await
    }
}

/// Always fails.
struct FailingSearch;

impl StationSearch for FailingSearch {
    async fn search(
        &self,
        _bbox: BoundingBox,
        _limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        Err(FuelSearchError::RateLimited)
    }
}

/// Counts calls to a fixed directory.
struct CountingSearch {
    directory: FixedStationDirectory,
    calls: AtomicUsize,
}

impl CountingSearch {
    fn new(stations: Vec<FuelStation>) -> Self {
        Self {
            directory: FixedStationDirectory::new(stations),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StationSearch for CountingSearch {
    async fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.directory.search(bbox, limit).await
    }
}

// ========== single-day trips ==========

#[test]
fn short_trip_has_pickup_drive_dropoff() {
    let plan = plan(&TripRequest::new(start(), 120));

    assert_eq!(plan.days.len(), 1);
    let day = &plan.days[0];
    assert!(day.activities.len() >= 3);
    assert_eq!(
        shape(day),
        vec![
            (ActivityKind::Pickup, 60),
            (ActivityKind::Drive, 120),
            (ActivityKind::Dropoff, 60),
        ]
    );
    assert_eq!(day.activities[0].start(), ts("2024-01-01T06:00:00Z"));
    assert_eq!(day.activities[1].start(), ts("2024-01-01T07:00:00Z"));
    assert_eq!(day.activities[2].end(), ts("2024-01-01T10:00:00Z"));
    assert_eq!(day.drive_consumed_minutes, 120);
    assert_eq!(day.date.to_string(), "2024-01-01");

    assert_eq!(plan.summary.requested_drive_minutes, 120);
    assert_eq!(plan.summary.remaining_drive_minutes, 0);
    assert!(plan.is_complete());
    assert!(plan.summary.warnings.is_empty());
}

#[test]
fn zero_drive_plans_nothing() {
    let plan = plan(&TripRequest::new(start(), 0));
    assert!(plan.days.is_empty());
    assert!(plan.is_complete());
    assert_eq!(plan.summary.days_planned, 0);
}

// ========== multi-day trips ==========

#[test]
fn fifteen_hour_trip_spans_two_days() {
    let plan = plan(&TripRequest::new(start(), 900));

    assert_eq!(plan.days.len(), 2);
    assert_eq!(
        shape(&plan.days[0]),
        vec![
            (ActivityKind::Pickup, 60),
            (ActivityKind::Drive, 480),
            (ActivityKind::Break, 30),
            (ActivityKind::Drive, 180),
            (ActivityKind::LimitReached, 600),
        ]
    );
    assert_eq!(plan.days[0].drive_consumed_minutes, 660);

    let day2 = &plan.days[1];
    assert_eq!(day2.date.to_string(), "2024-01-02");
    assert_eq!(day2.activities[0].start(), ts("2024-01-02T04:30:00Z"));
    assert_eq!(
        shape(day2),
        vec![(ActivityKind::Drive, 240), (ActivityKind::Dropoff, 60)]
    );

    assert_eq!(plan.summary.remaining_drive_minutes, 0);
    assert_eq!(plan.summary.days_planned, 2);
    assert_eq!(plan.total_driving_minutes(), 900);
}

#[test]
fn days_chain_without_gaps() {
    let plan = plan(&TripRequest::new(start(), 3000));

    assert!(plan.is_complete());
    assert_eq!(plan.days.len(), 5);
    for pair in plan.days.windows(2) {
        let prev_end = pair[0].activities.last().unwrap().end();
        let next_start = pair[1].activities[0].start();
        assert_eq!(prev_end, next_start);
        assert_eq!(pair[1].date, next_start.date_naive());
    }
    // Only the first day loads.
    let pickups = plan
        .activities()
        .filter(|a| a.kind() == ActivityKind::Pickup)
        .count();
    assert_eq!(pickups, 1);
}

#[test]
fn local_offset_decides_the_date() {
    // 23:00 in Chicago is already the next day in UTC.
    let request = TripRequest::new(ts("2024-03-01T23:00:00-06:00"), 60);
    let plan = plan(&request);
    assert_eq!(plan.days[0].date.to_string(), "2024-03-01");
}

// ========== rolling cycle ==========

#[test]
fn cycle_exhaustion_stops_without_restart() {
    let request = TripRequest::new(start(), 900).with_cycle_hours_used(65.0);
    let plan = plan(&request);

    assert_eq!(plan.days.len(), 1);
    assert_eq!(plan.days[0].remaining_cycle_hours, 0.0);
    assert_eq!(plan.summary.remaining_drive_minutes, 240);
    assert_eq!(plan.summary.warnings, vec![PlanWarning::CycleLimitReached]);
    assert!(plan.summary.warnings[0].is_blocking());
    assert!(!plan.is_complete());
}

#[test]
fn restart_resets_cycle() {
    let request = TripRequest::new(start(), 900)
        .with_cycle_hours_used(65.0)
        .with_restart(true);
    let plan = plan(&request);

    assert_eq!(plan.days.len(), 3);

    let restart_day = &plan.days[1];
    assert!(restart_day.is_restart());
    assert_eq!(
        shape(restart_day),
        vec![(ActivityKind::Restart34, 34 * 60)]
    );
    assert_eq!(restart_day.activities[0].start(), ts("2024-01-02T04:30:00Z"));
    assert_eq!(restart_day.warnings, vec![PlanWarning::RestartInserted]);
    assert_eq!(restart_day.remaining_cycle_hours, 70.0);

    // After the restart only the day's own 5 on-duty hours count.
    let after = &plan.days[2];
    assert_eq!(after.activities[0].start(), ts("2024-01-03T14:30:00Z"));
    assert_eq!(after.remaining_cycle_hours, 65.0);

    assert!(plan.is_complete());
    assert_eq!(plan.summary.warnings, vec![PlanWarning::RestartScheduled]);
    assert!(!plan.summary.warnings[0].is_blocking());
}

#[test]
fn finished_trip_ignores_exhausted_cycle() {
    let request = TripRequest::new(start(), 30)
        .with_cycle_hours_used(69.0)
        .with_restart(true);
    let plan = plan(&request);

    assert_eq!(plan.days.len(), 1);
    assert!(plan.is_complete());
    assert!(plan.summary.warnings.is_empty());
    assert_eq!(plan.days[0].remaining_cycle_hours, 0.0);
}

// ========== safety limits ==========

#[test]
fn max_days_truncates_with_warning() {
    let limits = SafetyLimits {
        max_days: 1,
        ..SafetyLimits::default()
    };
    let plan = plan_with_limits(&TripRequest::new(start(), 900), limits);

    assert_eq!(plan.days.len(), 1);
    assert_eq!(plan.summary.remaining_drive_minutes, 240);
    assert_eq!(
        plan.summary.warnings,
        vec![PlanWarning::Truncated(TruncationCause::MaxDays)]
    );
}

#[test]
fn trip_iteration_limit_truncates_with_warning() {
    let limits = SafetyLimits {
        max_trip_iterations: 1,
        ..SafetyLimits::default()
    };
    let plan = plan_with_limits(&TripRequest::new(start(), 900), limits);

    assert_eq!(plan.summary.remaining_drive_minutes, 240);
    assert_eq!(
        plan.summary.warnings,
        vec![PlanWarning::Truncated(TruncationCause::TripIterations)]
    );
}

#[test]
fn window_iteration_limit_truncates_with_warning() {
    let limits = SafetyLimits {
        max_window_iterations: 1,
        ..SafetyLimits::default()
    };
    let plan = plan_with_limits(&TripRequest::new(start(), 900), limits);

    assert_eq!(plan.days.len(), 1);
    assert_eq!(plan.summary.remaining_drive_minutes, 420);
    assert_eq!(
        plan.summary.warnings,
        vec![PlanWarning::Truncated(TruncationCause::WindowIterations)]
    );
}

// ========== fuel stops ==========

#[test]
fn fuel_stations_are_used_in_order_across_days() {
    let request = TripRequest::new(start(), 900)
        .with_distance_miles(1000.0)
        .with_fuel_interval_miles(200);
    let stations = vec![
        station(35.0, -97.0, "A"),
        station(36.0, -97.0, "B"),
        station(37.0, -97.0, "C"),
    ];
    let plan = schedule_trip(&request, &stations, &PlannerConfig::default());

    assert_eq!(
        shape(&plan.days[0]),
        vec![
            (ActivityKind::Pickup, 60),
            (ActivityKind::Drive, 480),
            (ActivityKind::Break, 30),
            (ActivityKind::FuelStop, 60),
            (ActivityKind::Drive, 180),
            (ActivityKind::FuelStop, 60),
            (ActivityKind::WindowEnd, 600),
        ]
    );
    assert_eq!(
        fuel_stop_names(&plan),
        vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("C".to_string())
        ]
    );
    assert_eq!(plan.summary.fuel_stops_inserted, 3);
    assert_eq!(plan.summary.fuel_stops_expected, 5);
}

#[test]
fn fuel_stops_without_stations_have_no_location() {
    let request = TripRequest::new(start(), 600)
        .with_distance_miles(600.0)
        .with_fuel_interval_miles(200);
    let plan = plan(&request);

    let names = fuel_stop_names(&plan);
    assert!(!names.is_empty());
    assert!(names.iter().all(Option::is_none));
}

// ========== planner with station lookup ==========

#[tokio::test]
async fn route_geometry_drives_station_lookup() {
    let route: Vec<_> = (0..=20)
        .map(|i| point(35.0 + f64::from(i) * 0.1, -97.0))
        .collect();
    let planner = planner(FixedStationDirectory::new(vec![
        station(35.0, -97.0, "Start"),
        station(36.0, -97.0, "Mid"),
        station(37.0, -97.0, "End"),
    ]));
    let request = TripRequest::new(start(), 900)
        .with_distance_miles(1000.0)
        .with_fuel_interval_miles(200)
        .with_route_polyline(encode_polyline(&route));

    let plan = planner.plan(&request).await.unwrap();
    assert_eq!(
        fuel_stop_names(&plan),
        vec![
            Some("Start".to_string()),
            Some("Mid".to_string()),
            Some("End".to_string())
        ]
    );
}

#[tokio::test]
async fn endpoints_drive_bbox_lookup_for_long_trips() {
    let search = Arc::new(CountingSearch::new(vec![station(40.5, -87.0, "Inside")]));
    let planner = planner(Arc::clone(&search));
    let request = TripRequest::new(start(), 200)
        .with_distance_miles(180.0)
        .with_fuel_interval_miles(100)
        .with_endpoints(point(41.88, -87.63), point(39.77, -86.16));

    let plan = planner.plan(&request).await.unwrap();
    assert_eq!(fuel_stop_names(&plan), vec![Some("Inside".to_string())]);
    assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn short_trips_skip_lookup() {
    let search = Arc::new(CountingSearch::new(vec![station(40.5, -87.0, "Inside")]));
    let planner = planner(Arc::clone(&search));
    let request = TripRequest::new(start(), 60)
        .with_distance_miles(40.0)
        .with_fuel_interval_miles(10)
        .with_endpoints(point(41.88, -87.63), point(41.5, -87.5));

    let plan = planner.plan(&request).await.unwrap();
    assert_eq!(search.calls(), 0);
    assert_eq!(fuel_stop_names(&plan), vec![None]);
}

#[tokio::test]
async fn lookup_failure_still_plans() {
    let planner = planner(FailingSearch);
    let request = TripRequest::new(start(), 900)
        .with_distance_miles(1000.0)
        .with_fuel_interval_miles(200)
        .with_endpoints(point(41.88, -87.63), point(32.78, -96.80));

    let plan = planner.plan(&request).await.unwrap();
    assert!(plan.is_complete());
    assert_eq!(plan.summary.fuel_stops_inserted, 3);
    assert!(fuel_stop_names(&plan).iter().all(Option::is_none));
}

#[tokio::test]
async fn cancellation_wins_over_slow_lookup() {
    let planner = planner(HangingSearch);
    let request = TripRequest::new(start(), 900)
        .with_distance_miles(1000.0)
        .with_endpoints(point(41.88, -87.63), point(32.78, -96.80));

    let result = planner.plan_until(&request, std::future::ready(())).await;
    assert_eq!(result, Err(PlanError::Cancelled));

    let result = planner
        .plan_within(&request, Duration::from_millis(20))
        .await;
    assert_eq!(result, Err(PlanError::Cancelled));
}

#[tokio::test]
async fn invalid_input_is_an_error() {
    let planner = planner(FixedStationDirectory::default());
    let request = TripRequest::new(start(), 900).with_route_polyline("not a polyline!");

    let result = planner.plan(&request).await;
    assert!(matches!(result, Err(PlanError::InvalidInput(_))));
}

#[tokio::test]
async fn oversized_handling_time_is_invalid_input() {
    let planner = planner(FixedStationDirectory::default());
    let request =
        TripRequest::new(start(), 120).with_handling_minutes(1_000_000_000_000, 60, 60);

    let result = planner.plan(&request).await;
    assert!(matches!(result, Err(PlanError::InvalidInput(_))));

    let request = TripRequest::new(start(), 900).with_handling_minutes(60, 60, i64::MAX);
    let result = planner.plan(&request).await;
    assert!(matches!(result, Err(PlanError::InvalidInput(_))));
}

// ========== invariants ==========

fn request_strategy() -> impl Strategy<Value = TripRequest> {
    (
        0i64..5000,
        0.0f64..69.0,
        any::<bool>(),
        prop::option::of(100.0f64..3000.0),
        100i64..1000,
    )
        .prop_map(|(drive, cycle, restart, distance, interval)| {
            let mut request = TripRequest::new(start(), drive)
                .with_cycle_hours_used(cycle)
                .with_restart(restart)
                .with_fuel_interval_miles(interval);
            request.distance_miles = distance;
            request
        })
}

proptest! {
    #[test]
    fn drive_minutes_are_conserved(request in request_strategy()) {
        let plan = plan(&request);
        let driven: i64 = plan
            .activities()
            .filter(|a| a.kind() == ActivityKind::Drive)
            .map(|a| a.minutes())
            .sum();

        prop_assert_eq!(
            driven,
            plan.summary.requested_drive_minutes - plan.summary.remaining_drive_minutes
        );
    }

    #[test]
    fn windows_respect_driving_and_window_caps(request in request_strategy()) {
        let rules = HosRules::default();
        let plan = plan(&request);

        for day in plan.days.iter().filter(|d| !d.is_restart()) {
            prop_assert!(day.driving_minutes() <= rules.max_driving_mins);

            let window_start = day.activities[0].start();
            for drive in day.activities.iter().filter(|a| a.kind() == ActivityKind::Drive) {
                prop_assert!(drive.end() <= window_start + rules.max_window());
            }
        }
    }

    #[test]
    fn break_follows_eight_hours_of_driving(request in request_strategy()) {
        let rules = HosRules::default();
        let plan = plan(&request);

        for day in &plan.days {
            let mut since_break = 0;
            for (i, activity) in day.activities.iter().enumerate() {
                match activity.kind() {
                    ActivityKind::Drive => {
                        since_break += activity.minutes();
                        prop_assert!(since_break <= rules.break_after_driving_mins);
                        if since_break == rules.break_after_driving_mins {
                            let next = &day.activities[i + 1];
                            prop_assert_eq!(next.kind(), ActivityKind::Break);
                            prop_assert_eq!(next.minutes(), rules.break_mins);
                        }
                    }
                    ActivityKind::Break => since_break = 0,
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn activities_are_ordered_and_contiguous(request in request_strategy()) {
        let plan = plan(&request);
        let activities: Vec<_> = plan.activities().collect();

        for pair in activities.windows(2) {
            prop_assert!(pair[0].start() <= pair[0].end());
            prop_assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn incomplete_plans_say_why(request in request_strategy()) {
        let plan = plan(&request);

        prop_assert!(plan.summary.remaining_drive_minutes >= 0);
        prop_assert!(
            plan.is_complete() || plan.summary.warnings.iter().any(PlanWarning::is_blocking)
        );
        prop_assert_eq!(plan.summary.days_planned, plan.days.len());
    }
}
