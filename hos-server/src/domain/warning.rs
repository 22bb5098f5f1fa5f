//! Warnings attached to planned days and trips.

use std::fmt;

/// Which safety limit cut a plan short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruncationCause {
    /// A single duty window ran out of iterations.
    WindowIterations,
    /// The day loop ran out of iterations.
    TripIterations,
    /// The maximum number of planned days was reached.
    MaxDays,
}

impl fmt::Display for TruncationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruncationCause::WindowIterations => f.write_str("window iteration limit"),
            TruncationCause::TripIterations => f.write_str("trip iteration limit"),
            TruncationCause::MaxDays => f.write_str("maximum day count"),
        }
    }
}

/// Something the caller should know about a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanWarning {
    /// Day-level note on a 34-hour restart entry.
    RestartInserted,
    /// Trip-level note that the plan relies on a 34-hour restart.
    RestartScheduled,
    /// The 70-hour cycle was exhausted and restarts are not allowed.
    CycleLimitReached,
    /// A safety limit stopped planning with drive time left.
    Truncated(TruncationCause),
}

impl PlanWarning {
    /// Blocking warnings mean the plan does not get the load delivered.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            PlanWarning::CycleLimitReached | PlanWarning::Truncated(_)
        )
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::RestartInserted => f.write_str("34-hour restart inserted to reset cycle."),
            PlanWarning::RestartScheduled => {
                f.write_str("34-hour restart inserted in plan (allow_restart=true).")
            }
            PlanWarning::CycleLimitReached => f.write_str(
                "Planned activities exceed 70-hour cycle limit. \
                 Set allow_restart=true to simulate a 34-hour restart.",
            ),
            PlanWarning::Truncated(cause) => {
                write!(f, "Planning stopped at the {cause} with drive time remaining.")
            }
        }
    }
}
