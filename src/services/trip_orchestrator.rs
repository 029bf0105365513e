use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::bookkeeping::Bookkeeping;
use crate::error::AppError;
use crate::models::{Coord, Location, Route, TripData, TripResponse};
use crate::providers::geocoder::Geocoder;
use crate::providers::route_client::RouteClient;
use crate::services::log_assembler::assemble_logs;
use crate::services::route_combiner::combine_routes;
use crate::services::stop_planner::{generate_stops, PlannerInput};

pub struct Orchestrator {
    pub route_client: Arc<RouteClient>,
    pub geocoder: Arc<Geocoder>,
}

impl Orchestrator {
    pub fn new(route_client: Arc<RouteClient>, geocoder: Arc<Geocoder>) -> Self {
        Self { route_client, geocoder }
    }

    pub async fn plan_trip(&self, trip: TripData) -> Result<TripResponse, AppError> {
        let current = validate_location(&trip.current_location.coordinates, "current")?;
        let pickup = validate_location(&trip.pickup_location.coordinates, "pickup")?;
        let dropoff = validate_location(&trip.dropoff_location.coordinates, "dropoff")?;

        let locations = vec![current, pickup, dropoff];
        let start_time = Local::now().naive_local().date().and_hms_opt(6, 0, 0).unwrap();

        info!(
            current = ?current,
            pickup = ?pickup,
            dropoff = ?dropoff,
            cycle_used = trip.current_cycle_used,
            "planning trip"
        );

        let mut segments = Vec::with_capacity(locations.len() - 1);
        for pair in locations.windows(2) {
            let segment = self.route_client.fetch_route(pair[0], pair[1]).await;
            segments.push(segment);
        }
        let route: Route = combine_routes(&segments);

        let mut location_names: Vec<Option<String>> = vec![None; locations.len()];
        for (i, loc) in locations.iter().enumerate().skip(1) {
            let coord: Coord = loc.to_coord();
            location_names[i] = Some(self.geocoder.reverse_geocode(coord).await);
        }

        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &location_names,
            start_time,
            cycle_used_hours: trip.current_cycle_used,
        });

        let seed = Bookkeeping::seed_from_request(&trip, start_time.and_utc().timestamp());
        let mut bookkeeping = Bookkeeping::new(seed);
        let eld_logs = assemble_logs(&stops, None, &mut bookkeeping);

        info!(stop_count = stops.len(), day_count = eld_logs.len(), "trip planned");

        Ok(TripResponse {
            coordinates: route.coordinates.clone(),
            stops,
            total_distance: route.distance,
            total_duration: route.duration,
            eld_logs,
        })
    }
}

/// Mirrors the reference implementation's "truthy lat AND lng" check: a
/// coordinate of exactly `0.0` on either axis is treated as missing, not as
/// the Gulf of Guinea.
fn validate_location(loc: &crate::models::LatLng, label: &str) -> Result<Location, AppError> {
    if loc.latitude == 0.0 || loc.longitude == 0.0 {
        return Err(AppError::InvalidInput(format!(
            "Missing or invalid coordinates in trip data ({label})"
        )));
    }
    Ok(Location { lat: loc.latitude, lng: loc.longitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;

    #[test]
    fn validate_location_rejects_zero_zero() {
        let loc = LatLng { latitude: 0.0, longitude: 0.0 };
        assert!(validate_location(&loc, "current").is_err());
    }

    #[test]
    fn validate_location_accepts_real_coordinates() {
        let loc = LatLng { latitude: 34.05, longitude: -118.25 };
        assert!(validate_location(&loc, "current").is_ok());
    }
}
