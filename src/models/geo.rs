use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A `{lat, lng}` point as received over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn to_coord(self) -> Coord {
        Coord([self.lng, self.lat])
    }
}

/// GeoJSON-ordered `[lng, lat]` pair. This is the only place the axes swap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coord(pub [f64; 2]);

impl Coord {
    pub fn lng(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    /// Great-circle distance in kilometers (Haversine, Earth radius 6371 km).
    pub fn haversine_km(&self, other: &Coord) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let (lat1, lon1) = (self.lat().to_radians(), self.lng().to_radians());
        let (lat2, lon2) = (other.lat().to_radians(), other.lng().to_radians());
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_to_coord_swaps_axes() {
        let loc = Location { lat: 34.05, lng: -118.25 };
        let c = loc.to_coord();
        assert_eq!(c.lng(), -118.25);
        assert_eq!(c.lat(), 34.05);
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let c = Coord([-118.25, 34.05]);
        assert!((c.haversine_km(&c)).abs() < 1e-9);
    }

    #[test]
    fn haversine_roughly_matches_known_distance() {
        // Los Angeles to Las Vegas is roughly 370 km as the crow flies.
        let la = Coord([-118.25, 34.05]);
        let vegas = Coord([-115.14, 36.17]);
        let d = la.haversine_km(&vegas);
        assert!((300.0..440.0).contains(&d), "got {d}");
    }
}
