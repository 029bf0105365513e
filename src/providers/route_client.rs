use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::models::{Coord, Location, RouteSegment};

#[derive(Debug, thiserror::Error)]
pub enum RouteClientError {
    #[error("routing provider unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Fetches a single origin-to-destination leg from an OSRM-style routing
/// provider, falling back to a synthesized great-circle route if the
/// provider is unreachable, times out, or returns no routes.
pub struct RouteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client build should not fail with static config");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_route(&self, origin: Location, destination: Location) -> RouteSegment {
        match self.fetch_from_provider(origin, destination).await {
            Ok(segment) => segment,
            Err(reason) => {
                warn!(%reason, "routing provider fallback: synthesizing mock route");
                generate_mock_route(origin, destination, 50)
            }
        }
    }

    async fn fetch_from_provider(
        &self,
        origin: Location,
        destination: Location,
    ) -> Result<RouteSegment, String> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, origin.lng, origin.lat, destination.lng, destination.lat
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("non-success status: {}", response.status()));
        }

        let parsed: OsrmResponse = response.json().await.map_err(|e| e.to_string())?;

        if parsed.code != "Ok" || parsed.routes.is_empty() {
            return Err(format!("no routes returned (code={})", parsed.code));
        }

        let route = &parsed.routes[0];
        Ok(RouteSegment {
            coordinates: route
                .geometry
                .coordinates
                .iter()
                .map(|c| Coord(*c))
                .collect(),
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}

/// Synthesizes a plausible driving route between two points when the real
/// routing provider is unavailable. Distance is inflated 1.3x over the
/// great-circle distance to approximate road curvature; a small amount of
/// jitter is added to interior points so the path doesn't look perfectly
/// straight.
pub fn generate_mock_route(origin: Location, destination: Location, num_points: usize) -> RouteSegment {
    let origin_c = origin.to_coord();
    let dest_c = destination.to_coord();

    let great_circle_km = origin_c.haversine_km(&dest_c).max(0.1);
    let driving_km = great_circle_km * 1.3;
    let duration_s = (driving_km / 80.0) * 3600.0;

    let n = num_points.max(2);
    let mut coordinates = Vec::with_capacity(n);
    for i in 0..n {
        let progress = i as f64 / (n - 1) as f64;
        let mut lng = origin_c.lng() + (dest_c.lng() - origin_c.lng()) * progress;
        let mut lat = origin_c.lat() + (dest_c.lat() - origin_c.lat()) * progress;

        if progress > 0.1 && progress < 0.9 {
            let randomness = 0.01 * (std::f64::consts::PI * progress).sin();
            lng += jitter(randomness, i as u64 * 2);
            lat += jitter(randomness, i as u64 * 2 + 1);
        }

        coordinates.push(Coord([lng, lat]));
    }

    RouteSegment {
        coordinates,
        distance_m: driving_km * 1000.0,
        duration_s,
    }
}

/// Deterministic pseudo-jitter in `[-amplitude, amplitude]`, seeded by index
/// so repeated planning of the same leg produces the same synthetic route.
fn jitter(amplitude: f64, seed: u64) -> f64 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    // Simple splitmix64-style scramble; we only need a stable value in
    // [0, 1), not cryptographic quality.
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^= z >> 31;
    let unit = (z as f64) / (u64::MAX as f64);
    (unit * 2.0 - 1.0) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_route_has_requested_point_count() {
        let origin = Location { lat: 34.05, lng: -118.25 };
        let dest = Location { lat: 36.17, lng: -115.14 };
        let route = generate_mock_route(origin, dest, 50);
        assert_eq!(route.coordinates.len(), 50);
    }

    #[test]
    fn mock_route_endpoints_are_exact() {
        let origin = Location { lat: 34.05, lng: -118.25 };
        let dest = Location { lat: 36.17, lng: -115.14 };
        let route = generate_mock_route(origin, dest, 50);
        assert_eq!(route.coordinates.first().unwrap().0, [origin.lng, origin.lat]);
        assert_eq!(route.coordinates.last().unwrap().0, [dest.lng, dest.lat]);
    }

    #[test]
    fn mock_route_same_point_clamps_minimum_distance() {
        let origin = Location { lat: 34.05, lng: -118.25 };
        let route = generate_mock_route(origin, origin, 50);
        // 0.1km floor * 1.3 inflation * 1000 m/km
        assert!((route.distance_m - 130.0).abs() < 1e-6);
    }

    #[test]
    fn mock_route_is_deterministic() {
        let origin = Location { lat: 34.05, lng: -118.25 };
        let dest = Location { lat: 36.17, lng: -115.14 };
        let a = generate_mock_route(origin, dest, 50);
        let b = generate_mock_route(origin, dest, 50);
        assert_eq!(a.coordinates.len(), b.coordinates.len());
        for (ca, cb) in a.coordinates.iter().zip(b.coordinates.iter()) {
            assert_eq!(ca.0, cb.0);
        }
    }
}
