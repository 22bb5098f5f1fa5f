//! Web layer for the trip planner.
//!
//! A health check and one JSON endpoint that plans a trip.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
