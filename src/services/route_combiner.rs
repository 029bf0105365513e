use crate::models::{Coord, Route, RouteSegment};

const METERS_TO_MILES: f64 = 0.000621371;

/// Concatenates per-leg route segments into a single route, converting
/// meters to miles and dropping the duplicate join vertex between legs.
pub fn combine_routes(segments: &[RouteSegment]) -> Route {
    let mut coordinates: Vec<Coord> = Vec::new();
    let mut distance = 0.0;
    let mut duration = 0.0;

    for (i, segment) in segments.iter().enumerate() {
        let points = if i == 0 {
            segment.coordinates.as_slice()
        } else {
            // Drop the first point of every leg after the first: it's the
            // same vertex as the previous leg's last point.
            if segment.coordinates.len() > 1 {
                &segment.coordinates[1..]
            } else {
                segment.coordinates.as_slice()
            }
        };
        coordinates.extend_from_slice(points);
        distance += segment.distance_m * METERS_TO_MILES;
        duration += segment.duration_s;
    }

    let pickup_coord = segments
        .first()
        .and_then(|s| s.coordinates.last().copied())
        .unwrap_or(Coord([0.0, 0.0]));
    let dropoff_coord = segments
        .last()
        .and_then(|s| s.coordinates.last().copied())
        .unwrap_or(Coord([0.0, 0.0]));

    Route {
        coordinates,
        distance,
        duration,
        pickup_coord,
        dropoff_coord,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(coords: Vec<[f64; 2]>, distance_m: f64, duration_s: f64) -> RouteSegment {
        RouteSegment {
            coordinates: coords.into_iter().map(Coord).collect(),
            distance_m,
            duration_s,
        }
    }

    #[test]
    fn drops_duplicate_join_vertex() {
        let legs = vec![
            segment(vec![[0.0, 0.0], [1.0, 1.0]], 1000.0, 60.0),
            segment(vec![[1.0, 1.0], [2.0, 2.0]], 2000.0, 120.0),
        ];
        let route = combine_routes(&legs);
        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[1].0, [1.0, 1.0]);
    }

    #[test]
    fn converts_meters_to_miles() {
        let legs = vec![segment(vec![[0.0, 0.0], [1.0, 1.0]], 1609.344, 60.0)];
        let route = combine_routes(&legs);
        assert!((route.distance - 1.0).abs() < 1e-3);
    }

    #[test]
    fn pickup_and_dropoff_coords_track_first_and_last_legs() {
        let legs = vec![
            segment(vec![[0.0, 0.0], [1.0, 1.0]], 1000.0, 60.0),
            segment(vec![[1.0, 1.0], [2.0, 2.0]], 2000.0, 120.0),
        ];
        let route = combine_routes(&legs);
        assert_eq!(route.pickup_coord.0, [1.0, 1.0]);
        assert_eq!(route.dropoff_coord.0, [2.0, 2.0]);
    }
}
