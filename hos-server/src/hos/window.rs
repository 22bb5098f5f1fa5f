//! Single duty-window scheduling.
//!
//! Plans one window: an optional pickup, then drive chunks cut by the
//! 14-hour window, the 11-hour driving cap and the 8-hour break rule,
//! with heuristic fuel stops, until the trip's drive time runs out or a
//! 10-hour rest closes the window.
//!
//! Two driving counters are kept. `driving_elapsed` covers the whole
//! window and feeds the 11-hour cap; breaks do not reset it.
//! `driving_since_break` feeds the 8-hour rule and is reset by each
//! 30-minute break.

use tracing::{debug, trace};

use crate::domain::{Activity, ActivityKind, FuelStation, Timestamp, minutes_between};

use super::config::{HosRules, SafetyLimits};

/// How fuel stops are placed when no fixed stop list exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelPolicy {
    pub distance_miles: Option<f64>,
    pub interval_miles: i64,
    /// Drive minutes for the whole trip, not just this window.
    pub trip_drive_minutes: i64,
    pub stop_minutes: i64,
}

impl FuelPolicy {
    /// Driving minutes that cover one fuel interval, if the trip distance
    /// is known.
    ///
    /// A drive chunk at least this long is followed by a fuel stop.
    pub fn interval_minutes(&self) -> Option<f64> {
        let distance = self.distance_miles.filter(|d| *d > 0.0)?;
        if self.interval_miles <= 0 || self.trip_drive_minutes <= 0 {
            return None;
        }
        Some(self.interval_miles as f64 / distance.max(1.0) * self.trip_drive_minutes as f64)
    }
}

/// Inputs for one duty window.
#[derive(Debug, Clone)]
pub struct WindowRequest<'a> {
    pub start: Timestamp,
    /// Trip drive minutes not yet planned.
    pub remaining_drive_minutes: i64,
    pub cycle_hours_used: f64,
    /// Non-zero only for the trip's first window.
    pub pickup_minutes: i64,
    /// Applied only if this window finishes the trip's driving.
    pub dropoff_minutes: i64,
    pub fuel: FuelPolicy,
    pub stations: &'a [FuelStation],
    /// Index of the next unused station in `stations`.
    pub station_cursor: usize,
}

/// What one duty window produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    pub activities: Vec<Activity>,
    pub remaining_cycle_hours: f64,
    pub drive_consumed_minutes: i64,
    pub fuel_stops_inserted: u32,
    /// Index of the next unused station after this window.
    pub station_cursor: usize,
    /// Set when the window stopped on its iteration limit.
    pub hit_iteration_limit: bool,
}

impl WindowPlan {
    /// End of the last activity, if any were planned.
    pub fn end(&self) -> Option<Timestamp> {
        self.activities.last().map(Activity::end)
    }
}

/// Running state while a window is planned.
struct WindowState {
    clock: Timestamp,
    window_start: Timestamp,
    driving_elapsed: i64,
    driving_since_break: i64,
    on_duty_elapsed: i64,
    remaining_drive: i64,
    drive_consumed: i64,
    fuel_stops: u32,
    station_cursor: usize,
    activities: Vec<Activity>,
}

impl WindowState {
    fn new(request: &WindowRequest<'_>) -> Self {
        Self {
            clock: request.start,
            window_start: request.start,
            driving_elapsed: 0,
            driving_since_break: 0,
            on_duty_elapsed: 0,
            remaining_drive: request.remaining_drive_minutes.max(0),
            drive_consumed: 0,
            fuel_stops: 0,
            station_cursor: request.station_cursor,
            activities: Vec::new(),
        }
    }

    /// Append an activity starting at the clock and advance past it.
    fn push(&mut self, activity: Activity) {
        self.clock = activity.end();
        self.activities.push(activity);
    }

    fn emit(&mut self, kind: ActivityKind, mins: i64) {
        self.push(Activity::new(kind, self.clock, mins));
    }

    fn window_minutes_left(&self, rules: &HosRules) -> i64 {
        rules.max_window_mins - minutes_between(&self.window_start, &self.clock)
    }
}

/// Plans one duty window under a set of [`HosRules`].
pub struct DutyWindowScheduler<'a> {
    rules: &'a HosRules,
    limits: &'a SafetyLimits,
}

impl<'a> DutyWindowScheduler<'a> {
    pub fn new(rules: &'a HosRules, limits: &'a SafetyLimits) -> Self {
        Self { rules, limits }
    }

    /// Plan a single duty window starting at `request.start`.
    pub fn plan(&self, request: &WindowRequest<'_>) -> WindowPlan {
        let rules = self.rules;
        let mut state = WindowState::new(request);

        let pickup = request.pickup_minutes.max(0);
        if pickup > 0 {
            state.emit(ActivityKind::Pickup, pickup);
            state.on_duty_elapsed += pickup;
        }

        let fuel_interval = request.fuel.interval_minutes();
        let fuel_stop_mins = request.fuel.stop_minutes.max(0);
        let mut iterations = 0;
        let mut hit_iteration_limit = false;

        while state.remaining_drive > 0 {
            if iterations >= self.limits.max_window_iterations {
                hit_iteration_limit = true;
                break;
            }
            iterations += 1;

            let window_left = state.window_minutes_left(rules);
            if window_left <= 0 {
                state.emit(ActivityKind::WindowEnd, rules.reset_off_duty_mins);
                break;
            }

            let driving_allowed = rules.max_driving_mins - state.driving_elapsed;
            if driving_allowed <= 0 {
                state.emit(ActivityKind::LimitReached, rules.reset_off_duty_mins);
                break;
            }

            // Stop exactly at the 8-hour mark rather than driving past it.
            let until_break = rules.break_after_driving_mins - state.driving_since_break;
            let chunk = state
                .remaining_drive
                .min(driving_allowed)
                .min(window_left)
                .min(until_break);
            if chunk <= 0 {
                break;
            }

            state.emit(ActivityKind::Drive, chunk);
            state.driving_elapsed += chunk;
            state.driving_since_break += chunk;
            state.on_duty_elapsed += chunk;
            state.remaining_drive -= chunk;
            state.drive_consumed += chunk;
            trace!(
                chunk,
                driving_elapsed = state.driving_elapsed,
                remaining = state.remaining_drive,
                "planned drive chunk"
            );

            // Break before fuel: the first activity after 8h of driving is the break.
            if state.driving_since_break >= rules.break_after_driving_mins {
                state.emit(ActivityKind::Break, rules.break_mins);
                state.on_duty_elapsed += rules.break_mins;
                state.driving_since_break = 0;
            }

            if fuel_interval.is_some_and(|interval| chunk as f64 >= interval) {
                let mut stop = Activity::new(ActivityKind::FuelStop, state.clock, fuel_stop_mins);
                if let Some(station) = request.stations.get(state.station_cursor) {
                    stop = stop.with_station(station.clone());
                    state.station_cursor += 1;
                }
                state.push(stop);
                state.on_duty_elapsed += fuel_stop_mins;
                state.fuel_stops += 1;
            }
        }

        let dropoff = request.dropoff_minutes.max(0);
        if state.remaining_drive <= 0 && dropoff > 0 {
            state.emit(ActivityKind::Dropoff, dropoff);
            state.on_duty_elapsed += dropoff;
        }

        let used_hours = request.cycle_hours_used.max(0.0) + state.on_duty_elapsed as f64 / 60.0;
        let remaining_cycle_hours = (rules.cycle_limit_hours - used_hours).max(0.0);

        debug!(
            start = %request.start,
            activities = state.activities.len(),
            drive_consumed = state.drive_consumed,
            remaining_cycle_hours,
            "planned duty window"
        );

        WindowPlan {
            activities: state.activities,
            remaining_cycle_hours,
            drive_consumed_minutes: state.drive_consumed,
            fuel_stops_inserted: state.fuel_stops,
            station_cursor: state.station_cursor,
            hit_iteration_limit,
        }
    }
}
