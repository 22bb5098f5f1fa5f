//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::hos::{PlanError, TripRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/plan-trip", post(plan_trip))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a trip.
async fn plan_trip(
    State(state): State<AppState>,
    body: Result<Json<PlanTripRequest>, JsonRejection>,
) -> Result<Json<PlanTripResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;
    let request = TripRequest::try_from(req)?;

    let plan = state
        .planner
        .plan_within(&request, state.plan_timeout)
        .await?;

    info!(
        days = plan.summary.days_planned,
        complete = plan.is_complete(),
        "plan-trip request served"
    );
    Ok(Json(PlanTripResponse::from_plan(&plan)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidInput(message) => AppError::BadRequest { message },
            PlanError::Cancelled => AppError::Unavailable {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
