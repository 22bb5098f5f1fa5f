//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::fuel::StationBackend;
use crate::hos::TripPlanner;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Trip planner over the configured station search
    pub planner: Arc<TripPlanner<StationBackend>>,

    /// Upper bound on one planning call, station lookups included
    pub plan_timeout: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: TripPlanner<StationBackend>, plan_timeout: Duration) -> Self {
        Self {
            planner: Arc::new(planner),
            plan_timeout,
        }
    }
}
