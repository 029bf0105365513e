use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::geo::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StopType {
    Start,
    OffDuty,
    Pretrip,
    Fuel,
    Rest,
    Overnight,
    Pickup,
    Waypoint,
    Dropoff,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(rename = "type")]
    pub stop_type: StopType,
    pub name: String,
    pub coordinates: Coord,
    pub duration: String,
    pub estimated_arrival: NaiveDateTime,
}

impl Stop {
    pub fn new(
        stop_type: StopType,
        name: impl Into<String>,
        coordinates: Coord,
        duration: impl Into<String>,
        estimated_arrival: NaiveDateTime,
    ) -> Self {
        Self {
            stop_type,
            name: name.into(),
            coordinates,
            duration: duration.into(),
            estimated_arrival,
        }
    }
}
