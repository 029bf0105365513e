use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::{AppError, ErrorResponse};
use crate::models::{TripRequest, TripResponse};
use crate::services::trip_orchestrator::Orchestrator;

#[derive(Clone)]
pub struct TripState {
    pub orchestrator: std::sync::Arc<Orchestrator>,
}

#[utoipa::path(
    post,
    path = "/trip/",
    request_body = TripRequest,
    responses(
        (status = 200, description = "Trip planned successfully", body = TripResponse),
        (status = 400, description = "Missing or invalid coordinates in trip data", body = ErrorResponse),
        (status = 500, description = "Unexpected planning failure", body = ErrorResponse),
    ),
    tag = "trip"
)]
pub async fn plan_trip(
    State(state): State<TripState>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    let response = state.orchestrator.plan_trip(request.trip).await?;
    Ok(Json(response))
}

pub fn router(state: TripState) -> Router {
    Router::new().route("/", post(plan_trip)).with_state(state)
}
