//! Hours-of-service scheduling.
//!
//! [`DutyWindowScheduler`] plans a single duty window; [`TripPlanner`]
//! chains windows across days, tracks the rolling cycle, and inserts
//! 34-hour restarts when allowed.

mod config;
mod error;
mod request;
mod trip;
mod window;

#[cfg(test)]
mod trip_tests;

pub use config::{HosRules, PlannerConfig, SafetyLimits};
pub use error::PlanError;
pub use request::{DEFAULT_FUEL_INTERVAL_MILES, DEFAULT_HANDLING_MINS, MAX_HANDLING_MINS, TripRequest};
pub use trip::{TripPlanner, schedule_trip};
pub use window::{DutyWindowScheduler, FuelPolicy, WindowPlan, WindowRequest};
