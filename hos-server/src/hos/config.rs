//! Hours-of-service rules and planner safety limits.

use chrono::Duration;

/// The regulatory limits a plan must respect.
///
/// Defaults are the US property-carrying rules: 11 hours driving inside
/// a 14-hour window, a 30-minute break after 8 hours of driving, 10 hours
/// off to reset the window, 70 hours on duty per rolling 8 days, and a
/// 34-hour restart.
#[derive(Debug, Clone, PartialEq)]
pub struct HosRules {
    /// Maximum driving per duty window (minutes).
    pub max_driving_mins: i64,

    /// Length of the duty window (minutes).
    pub max_window_mins: i64,

    /// Driving allowed before a break is required (minutes).
    pub break_after_driving_mins: i64,

    /// Length of the required break (minutes).
    pub break_mins: i64,

    /// Off-duty time that closes a window (minutes).
    pub reset_off_duty_mins: i64,

    /// On-duty hours allowed per rolling cycle.
    pub cycle_limit_hours: f64,

    /// Consecutive off-duty time that resets the cycle (minutes).
    pub restart_mins: i64,
}

impl HosRules {
    /// Returns the window length as a Duration.
    pub fn max_window(&self) -> Duration {
        Duration::minutes(self.max_window_mins)
    }

    /// Returns the restart length as a Duration.
    pub fn restart(&self) -> Duration {
        Duration::minutes(self.restart_mins)
    }
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            max_driving_mins: 11 * 60,
            max_window_mins: 14 * 60,
            break_after_driving_mins: 8 * 60,
            break_mins: 30,
            reset_off_duty_mins: 10 * 60,
            cycle_limit_hours: 70.0,
            restart_mins: 34 * 60,
        }
    }
}

/// Circuit breakers against inputs that never converge.
///
/// When one trips, the plan is returned as-is with drive time remaining
/// and a blocking warning; it is never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyLimits {
    /// Loop iterations allowed inside one duty window.
    pub max_window_iterations: usize,

    /// Day-loop iterations allowed for one trip.
    pub max_trip_iterations: usize,

    /// Days (duty windows) planned before giving up.
    pub max_days: usize,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_window_iterations: 2000,
            max_trip_iterations: 2000,
            max_days: 30,
        }
    }
}

/// Everything the scheduling phase needs besides the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerConfig {
    pub rules: HosRules,
    pub limits: SafetyLimits,
}

impl PlannerConfig {
    pub fn new(rules: HosRules, limits: SafetyLimits) -> Self {
        Self { rules, limits }
    }

    /// Replace the safety limits.
    pub fn with_limits(mut self, limits: SafetyLimits) -> Self {
        self.limits = limits;
        self
    }
}
