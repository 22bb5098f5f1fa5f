//! Domain types for hours-of-service trip planning.
//!
//! Everything here is created fresh for a planning call and is immutable
//! once it lands in a result. Constructors enforce their invariants, so
//! a `GeoPoint` is always in range and an `Activity` never ends before
//! it starts.

mod activity;
mod geo;
mod schedule;
mod station;
mod time;
mod warning;

pub use activity::{Activity, ActivityKind, DutyStatus};
pub use geo::{BoundingBox, GeoPoint, InvalidGeoPoint, KM_PER_DEGREE};
pub use schedule::{DaySchedule, TripPlan, TripSummary};
pub use station::{DEFAULT_STATION_NAME, FuelStation};
pub use time::{TimeError, Timestamp, format_timestamp, minutes_between, parse_timestamp};
pub use warning::{PlanWarning, TruncationCause};
