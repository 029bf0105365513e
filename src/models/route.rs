use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::geo::Coord;

/// One origin-to-destination leg resolved to a polyline, as returned by the
/// routing provider (or synthesized when it is unreachable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    pub coordinates: Vec<Coord>,
    /// Meters, as reported by the routing provider.
    pub distance_m: f64,
    /// Seconds, as reported by the routing provider.
    pub duration_s: f64,
}

/// The full multi-leg route for a trip, in miles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub coordinates: Vec<Coord>,
    pub distance: f64,
    pub duration: f64,
    pub pickup_coord: Coord,
    pub dropoff_coord: Coord,
}

impl Route {
    /// Sample a point along the route by fractional progress, clamped to `[0,1]`.
    pub fn interpolate(&self, percentage: f64) -> Coord {
        if self.coordinates.is_empty() {
            return Coord([0.0, 0.0]);
        }
        let p = percentage.clamp(0.0, 1.0);
        let n = self.coordinates.len();
        let idx = ((p * n as f64) as usize).min(n - 1);
        self.coordinates[idx]
    }
}
