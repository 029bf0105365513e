use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::geo::Coord;
use super::log::DailyLogSheet;
use super::stop::Stop;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationWrapper {
    pub coordinates: LatLng,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripData {
    pub current_location: LocationWrapper,
    pub pickup_location: LocationWrapper,
    pub dropoff_location: LocationWrapper,
    #[serde(default)]
    pub current_cycle_used: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TripRequest {
    pub trip: TripData,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub coordinates: Vec<Coord>,
    pub stops: Vec<Stop>,
    pub total_distance: f64,
    pub total_duration: f64,
    pub eld_logs: Vec<DailyLogSheet>,
}
