//! Planning error types.
//!
//! Only genuinely bad input and cancellation are errors. Lookup
//! failures, exhausted cycles and tripped safety limits all produce a
//! (possibly partial) plan instead.

use crate::domain::{InvalidGeoPoint, TimeError};

/// Errors from a trip-planning call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The request cannot be planned as given
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller's cancellation signal fired first
    #[error("planning cancelled before completion")]
    Cancelled,
}

impl From<InvalidGeoPoint> for PlanError {
    fn from(e: InvalidGeoPoint) -> Self {
        PlanError::InvalidInput(e.to_string())
    }
}

impl From<TimeError> for PlanError {
    fn from(e: TimeError) -> Self {
        PlanError::InvalidInput(e.to_string())
    }
}
