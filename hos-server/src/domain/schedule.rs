//! Planned days and whole-trip results.

use chrono::NaiveDate;

use super::{Activity, ActivityKind, DutyStatus, PlanWarning};

/// The activities planned for one duty window, keyed by its start date.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    /// Chronological, non-overlapping.
    pub activities: Vec<Activity>,
    pub warnings: Vec<PlanWarning>,
    pub remaining_cycle_hours: f64,
    pub drive_consumed_minutes: i64,
    pub fuel_stops_inserted: u32,
}

impl DaySchedule {
    /// Total minutes logged under `status`.
    pub fn minutes_in(&self, status: DutyStatus) -> i64 {
        self.activities
            .iter()
            .filter(|a| a.status() == status)
            .map(Activity::minutes)
            .sum()
    }

    pub fn driving_minutes(&self) -> i64 {
        self.minutes_in(DutyStatus::Driving)
    }

    /// Driving plus on-duty (not driving) minutes: what the day costs the cycle.
    pub fn on_duty_minutes(&self) -> i64 {
        self.activities
            .iter()
            .filter(|a| a.status().counts_toward_cycle())
            .map(Activity::minutes)
            .sum()
    }

    pub fn off_duty_minutes(&self) -> i64 {
        self.minutes_in(DutyStatus::OffDuty)
    }

    /// Whether this entry is a standalone 34-hour restart.
    pub fn is_restart(&self) -> bool {
        self.activities
            .iter()
            .any(|a| a.kind() == ActivityKind::Restart34)
    }
}

/// Totals and warnings for a whole trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub requested_drive_minutes: i64,
    /// Drive minutes left unplanned; non-zero means the plan is incomplete.
    pub remaining_drive_minutes: i64,
    pub days_planned: usize,
    pub fuel_stops_expected: u32,
    pub fuel_stops_inserted: u32,
    pub warnings: Vec<PlanWarning>,
}

/// A multi-day plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub days: Vec<DaySchedule>,
    pub summary: TripSummary,
}

impl TripPlan {
    /// True when every requested drive minute was scheduled.
    pub fn is_complete(&self) -> bool {
        self.summary.remaining_drive_minutes <= 0
    }

    /// All activities across every day, in order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days.iter().flat_map(|d| d.activities.iter())
    }

    /// Sum of every planned drive block.
    pub fn total_driving_minutes(&self) -> i64 {
        self.days.iter().map(DaySchedule::driving_minutes).sum()
    }
}
