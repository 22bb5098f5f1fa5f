//! Timed duty-status activities.
//!
//! An [`Activity`] is one contiguous block on a driver's log. Its
//! [`ActivityKind`] fixes the [`DutyStatus`], so a drive can never be
//! recorded as off duty.

use std::fmt;

use chrono::Duration;

use super::time::{Timestamp, minutes};
use super::FuelStation;

/// Duty status as drawn on the paper log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyStatus {
    OffDuty,
    Driving,
    OnDuty,
}

impl DutyStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "OffDuty",
            DutyStatus::Driving => "Driving",
            DutyStatus::OnDuty => "OnDuty",
        }
    }

    /// Driving and on-duty (not driving) time both count against the cycle.
    pub fn counts_toward_cycle(&self) -> bool {
        matches!(self, DutyStatus::Driving | DutyStatus::OnDuty)
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a block of time is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Pickup,
    Drive,
    FuelStop,
    Break,
    Dropoff,
    /// 10 hours off because the 14-hour window closed.
    WindowEnd,
    /// 10 hours off because the 11-hour driving limit was reached.
    LimitReached,
    /// 34 consecutive hours off, resetting the cycle.
    Restart34,
}

impl ActivityKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Pickup => "pickup",
            ActivityKind::Drive => "drive",
            ActivityKind::FuelStop => "fuel_stop",
            ActivityKind::Break => "break",
            ActivityKind::Dropoff => "dropoff",
            ActivityKind::WindowEnd => "window_end",
            ActivityKind::LimitReached => "limit_reached",
            ActivityKind::Restart34 => "restart_34",
        }
    }

    /// The duty status this kind of activity is logged under.
    pub fn status(&self) -> DutyStatus {
        match self {
            ActivityKind::Drive => DutyStatus::Driving,
            ActivityKind::Pickup | ActivityKind::FuelStop | ActivityKind::Dropoff => {
                DutyStatus::OnDuty
            }
            ActivityKind::Break
            | ActivityKind::WindowEnd
            | ActivityKind::LimitReached
            | ActivityKind::Restart34 => DutyStatus::OffDuty,
        }
    }

    /// Log remark recorded with the activity.
    pub fn note(&self) -> &'static str {
        match self {
            ActivityKind::Pickup => "Pickup / loading",
            ActivityKind::Drive => "",
            ActivityKind::FuelStop => "Fuel stop",
            ActivityKind::Break => "30-min required break",
            ActivityKind::Dropoff => "Dropoff / unloading",
            ActivityKind::WindowEnd => "10-hr off to restart 14-hr window",
            ActivityKind::LimitReached => "Reached 11-hr driving limit; 10-hr off required",
            ActivityKind::Restart34 => "34-hour restart inserted",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block of time on the log.
///
/// `start <= end` always holds: lengths are clamped to zero at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    start: Timestamp,
    end: Timestamp,
    kind: ActivityKind,
    note: String,
    station: Option<FuelStation>,
}

impl Activity {
    /// An activity of `kind` starting at `start` and lasting `length_mins`.
    pub fn new(kind: ActivityKind, start: Timestamp, length_mins: i64) -> Self {
        Self {
            start,
            end: start + minutes(length_mins),
            kind,
            note: kind.note().to_string(),
            station: None,
        }
    }

    /// Attach the fuel station this stop is planned at.
    pub fn with_station(mut self, station: FuelStation) -> Self {
        self.station = Some(station);
        self
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn status(&self) -> DutyStatus {
        self.kind.status()
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn station(&self) -> Option<&FuelStation> {
        self.station.as_ref()
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Length in whole minutes.
    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }
}
