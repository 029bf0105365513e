pub mod trip;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::trip::TripState;

#[derive(OpenApi)]
#[openapi(
    info(title = "ELD Trip Planner", version = "0.1.0"),
    paths(trip::plan_trip),
    components(schemas(
        crate::models::TripRequest,
        crate::models::TripData,
        crate::models::LocationWrapper,
        crate::models::LatLng,
        crate::models::TripResponse,
        crate::models::Coord,
        crate::models::Stop,
        crate::models::StopType,
        crate::models::DailyLogSheet,
        crate::models::DutyStatus,
        crate::models::DutyStatusKind,
        crate::models::Remark,
        crate::models::GraphData,
        crate::models::LogEntry,
        crate::models::Violation,
        crate::models::ViolationType,
        crate::error::ErrorResponse,
    )),
    tags((name = "trip", description = "Trip planning and ELD log generation"))
)]
struct ApiDoc;

pub fn router(trip_state: TripState) -> Router {
    Router::new()
        .nest("/trip", trip::router(trip_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
