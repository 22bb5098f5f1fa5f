//! Multi-day trip planning.
//!
//! Chains duty windows day after day. Each day starts where the previous
//! one ended, so the loop is strictly sequential; the only concurrent work
//! is the fuel-station lookup that runs once before it.

use std::future::Future;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tracing::{debug, info, warn};

use crate::domain::{
    Activity, ActivityKind, DaySchedule, FuelStation, PlanWarning, Timestamp, TripPlan,
    TripSummary, TruncationCause,
};
use crate::fuel::{FuelStationLocator, StationSearch};

use super::config::PlannerConfig;
use super::error::PlanError;
use super::request::TripRequest;
use super::window::{DutyWindowScheduler, FuelPolicy, WindowRequest};

/// Plans trips: locates fuel stations, then schedules day by day.
pub struct TripPlanner<S> {
    locator: FuelStationLocator<S>,
    config: PlannerConfig,
}

impl<S: StationSearch> TripPlanner<S> {
    pub fn new(locator: FuelStationLocator<S>, config: PlannerConfig) -> Self {
        Self { locator, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip.
    ///
    /// Lookup failures never fail the plan. A plan cut short by the cycle
    /// limit or a safety limit comes back with drive minutes remaining.
    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        request.validate()?;
        let stations = self.resolve_stations(request).await;
        Ok(schedule_trip(request, &stations, &self.config))
    }

    /// Plan a trip, giving up with [`PlanError::Cancelled`] if `cancel`
    /// completes first.
    pub async fn plan_until<F>(&self, request: &TripRequest, cancel: F) -> Result<TripPlan, PlanError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.plan(request) => result,
            () = cancel => {
                warn!("trip planning cancelled");
                Err(PlanError::Cancelled)
            }
        }
    }

    /// Plan a trip within `timeout`.
    pub async fn plan_within(
        &self,
        request: &TripRequest,
        timeout: Duration,
    ) -> Result<TripPlan, PlanError> {
        self.plan_until(request, tokio::time::sleep(timeout)).await
    }

    /// Route geometry wins; otherwise a box between the endpoints for
    /// trips long enough to need fuel; otherwise nothing.
    async fn resolve_stations(&self, request: &TripRequest) -> Vec<FuelStation> {
        if let Some(polyline) = &request.route_polyline {
            return self.locator.near_route(polyline).await;
        }

        let min_distance = self.locator.config().min_bbox_distance_miles;
        let long_enough = request.distance_miles.is_some_and(|d| d > min_distance);
        match (request.origin(), request.dropoff_location) {
            (Some(from), Some(to)) if long_enough => self.locator.between(&from, &to).await,
            _ => Vec::new(),
        }
    }
}

/// Mutable state owned by the day loop.
struct TripState {
    clock: Timestamp,
    remaining_drive: i64,
    cycle_hours_used: f64,
    day_index: usize,
    iterations: usize,
    fuel_stops_inserted: u32,
    station_cursor: usize,
    warnings: Vec<PlanWarning>,
    days: Vec<DaySchedule>,
}

impl TripState {
    fn truncate(&mut self, cause: TruncationCause) {
        warn!(
            %cause,
            remaining_drive = self.remaining_drive,
            days = self.days.len(),
            "trip plan truncated"
        );
        self.warnings.push(PlanWarning::Truncated(cause));
    }

    /// Append a standalone 34-hour restart and reset the cycle.
    fn insert_restart(&mut self, config: &PlannerConfig) {
        let restart = Activity::new(ActivityKind::Restart34, self.clock, config.rules.restart_mins);
        self.days.push(DaySchedule {
            date: self.clock.date_naive(),
            activities: vec![restart],
            warnings: vec![PlanWarning::RestartInserted],
            remaining_cycle_hours: config.rules.cycle_limit_hours,
            drive_consumed_minutes: 0,
            fuel_stops_inserted: 0,
        });
        self.clock += config.rules.restart();
        self.cycle_hours_used = 0.0;
        self.warnings.push(PlanWarning::RestartScheduled);
    }
}

/// Schedule a trip against an already-located set of fuel stations.
///
/// This is the CPU-bound half of [`TripPlanner::plan`]: deterministic for
/// a given request and station list.
pub fn schedule_trip(
    request: &TripRequest,
    stations: &[FuelStation],
    config: &PlannerConfig,
) -> TripPlan {
    let rules = &config.rules;
    let limits = &config.limits;
    let scheduler = DutyWindowScheduler::new(rules, limits);
    let requested = request.drive_minutes();

    let fuel = FuelPolicy {
        distance_miles: request.distance_miles,
        interval_miles: request.fuel_interval_miles,
        trip_drive_minutes: requested,
        stop_minutes: request.fuel_stop_minutes,
    };

    let mut state = TripState {
        clock: request.start,
        remaining_drive: requested,
        cycle_hours_used: request.cycle_hours_used.max(0.0),
        day_index: 0,
        iterations: 0,
        fuel_stops_inserted: 0,
        station_cursor: 0,
        warnings: Vec::new(),
        days: Vec::new(),
    };

    while state.remaining_drive > 0 {
        if state.iterations >= limits.max_trip_iterations {
            state.truncate(TruncationCause::TripIterations);
            break;
        }
        if state.day_index >= limits.max_days {
            state.truncate(TruncationCause::MaxDays);
            break;
        }
        state.iterations += 1;

        let window = scheduler.plan(&WindowRequest {
            start: state.clock,
            remaining_drive_minutes: state.remaining_drive,
            cycle_hours_used: state.cycle_hours_used,
            pickup_minutes: if state.day_index == 0 {
                request.pickup_minutes
            } else {
                0
            },
            dropoff_minutes: request.dropoff_minutes,
            fuel,
            stations,
            station_cursor: state.station_cursor,
        });

        let end = window.end();
        let day = DaySchedule {
            date: state.clock.date_naive(),
            activities: window.activities,
            warnings: Vec::new(),
            remaining_cycle_hours: window.remaining_cycle_hours,
            drive_consumed_minutes: window.drive_consumed_minutes,
            fuel_stops_inserted: window.fuel_stops_inserted,
        };

        state.remaining_drive -= day.drive_consumed_minutes;
        state.fuel_stops_inserted += day.fuel_stops_inserted;
        state.station_cursor = window.station_cursor;
        // An empty window still has to move the clock forward.
        state.clock = end.unwrap_or(state.clock + ChronoDuration::days(1));

        // The day's own activities are the authoritative cycle accounting.
        state.cycle_hours_used += day.on_duty_minutes() as f64 / 60.0;

        debug!(
            day = state.day_index,
            date = %day.date,
            drive_consumed = day.drive_consumed_minutes,
            remaining_drive = state.remaining_drive,
            cycle_hours_used = state.cycle_hours_used,
            "planned day"
        );
        state.days.push(day);

        if window.hit_iteration_limit && state.remaining_drive > 0 {
            state.truncate(TruncationCause::WindowIterations);
            break;
        }

        // A finished trip needs no restart, even on an exhausted cycle.
        if state.remaining_drive > 0 && state.cycle_hours_used >= rules.cycle_limit_hours {
            if request.allow_restart {
                state.insert_restart(config);
            } else {
                warn!(
                    cycle_hours_used = state.cycle_hours_used,
                    remaining_drive = state.remaining_drive,
                    "cycle limit reached and restarts not allowed"
                );
                state.warnings.push(PlanWarning::CycleLimitReached);
                break;
            }
        }

        state.day_index += 1;
    }

    let summary = TripSummary {
        requested_drive_minutes: requested,
        remaining_drive_minutes: state.remaining_drive.max(0),
        days_planned: state.days.len(),
        fuel_stops_expected: request.fuel_stops_expected(),
        fuel_stops_inserted: state.fuel_stops_inserted,
        warnings: state.warnings,
    };

    info!(
        days = summary.days_planned,
        requested = summary.requested_drive_minutes,
        remaining = summary.remaining_drive_minutes,
        fuel_stops = summary.fuel_stops_inserted,
        "trip planned"
    );

    TripPlan {
        days: state.days,
        summary,
    }
}
