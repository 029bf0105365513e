use chrono::{Duration as ChronoDuration, NaiveDateTime, Timelike};

use crate::models::{Location, Route, Stop, StopType};

pub const MAX_DRIVING_H: f64 = 11.0;
pub const MAX_ON_DUTY_H: f64 = 14.0;
pub const REST_REQUIRED_H: f64 = 10.0;
pub const PRE_TRIP_H: f64 = 6.5;
pub const DRIVE_START_H: f64 = 7.0;
pub const DRIVE_END_H: f64 = 17.5;
pub const SLEEPER_START_H: f64 = 19.0;
pub const SLEEPER_END_H: f64 = 6.5;
pub const FUEL_INTERVAL_MI: f64 = 500.0;
pub const AVG_SPEED_MPH: f64 = 60.0;
pub const BREAK_DUR_H: f64 = 0.5;
pub const STOP_DUR_H: f64 = 0.5;
pub const PREFERRED_BREAK_H: f64 = 14.0;
pub const BREAK_TRIGGER_H: f64 = 8.0;

const EPS: f64 = 1e-9;

fn hour_of(dt: NaiveDateTime) -> f64 {
    dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0
}

fn at_hour(dt: NaiveDateTime, hour: f64) -> NaiveDateTime {
    let midnight = dt.date().and_hms_opt(0, 0, 0).unwrap();
    midnight + ChronoDuration::milliseconds((hour * 3_600_000.0).round() as i64)
}

fn add_hours(dt: NaiveDateTime, hours: f64) -> NaiveDateTime {
    dt + ChronoDuration::milliseconds((hours * 3_600_000.0).round() as i64)
}

fn next_day_at(dt: NaiveDateTime, hour: f64) -> NaiveDateTime {
    at_hour(dt + ChronoDuration::days(1), hour)
}

fn hours_until_end_of_day(dt: NaiveDateTime) -> f64 {
    (DRIVE_END_H - hour_of(dt)).max(0.0)
}

fn next_drive_start(dt: NaiveDateTime) -> NaiveDateTime {
    let h = hour_of(dt);
    if h < DRIVE_START_H {
        at_hour(dt, DRIVE_START_H)
    } else if h >= DRIVE_END_H {
        next_day_at(dt, DRIVE_START_H)
    } else {
        dt
    }
}

/// Advances `hours` of driving from `start`, stepping across day boundaries
/// as needed. Implemented iteratively since the number of days for a
/// long-haul trip is unbounded.
fn drive_with_clamp(start: NaiveDateTime, mut hours: f64) -> NaiveDateTime {
    let mut t = next_drive_start(start);
    loop {
        let remaining_today = hours_until_end_of_day(t);
        if hours <= remaining_today + EPS {
            return add_hours(t, hours);
        }
        hours -= remaining_today;
        t = next_day_at(t, DRIVE_START_H);
    }
}

fn align_break(t: NaiveDateTime) -> NaiveDateTime {
    let h = hour_of(t);
    if h > PREFERRED_BREAK_H {
        t
    } else if (12.0..PREFERRED_BREAK_H).contains(&h) {
        at_hour(t, PREFERRED_BREAK_H)
    } else {
        t
    }
}

fn safe_frac(position_mi: f64, total_mi: f64) -> f64 {
    if total_mi <= 0.0 {
        0.0
    } else {
        (position_mi / total_mi).clamp(0.0, 1.0)
    }
}

fn format_span(start: NaiveDateTime, end_hour: f64) -> String {
    let end = at_hour(start, end_hour);
    format_duration_between(start, end)
}

fn format_duration_between(from: NaiveDateTime, to: NaiveDateTime) -> String {
    let mins = (to - from).num_minutes().max(0);
    format!("{mins} min")
}

/// Inserts the end-of-driving-day sequence (off-duty wind-down, mandatory
/// 10-hour rest, and an early-morning sleeper-berth bridge if the rest ends
/// before the driving day can start) and returns the time driving may
/// resume.
fn handle_end_of_day(stops: &mut Vec<Stop>, coord: crate::models::Coord, mut now: NaiveDateTime) -> NaiveDateTime {
    let h = hour_of(now);
    if h >= DRIVE_END_H - EPS && h < SLEEPER_START_H {
        stops.push(Stop::new(
            StopType::OffDuty,
            "End of Driving Day",
            coord,
            format_span(now, SLEEPER_START_H),
            now,
        ));
        now = at_hour(now, SLEEPER_START_H);
    }
    stops.push(Stop::new(
        StopType::Overnight,
        "Required 10-Hour Rest",
        coord,
        "10 h",
        now,
    ));
    now = add_hours(now, REST_REQUIRED_H);
    if hour_of(now) < SLEEPER_END_H {
        stops.push(Stop::new(
            StopType::Overnight,
            "Early Morning Rest (Sleeper Berth)",
            coord,
            format_span(now, SLEEPER_END_H),
            now,
        ));
        now = at_hour(now, SLEEPER_END_H);
    }
    now
}

fn insert_break(stops: &mut Vec<Stop>, coord: crate::models::Coord, now: NaiveDateTime) -> NaiveDateTime {
    let break_time = align_break(now);
    stops.push(Stop::new(
        StopType::Rest,
        "30-Minute Break",
        coord,
        "30 min",
        break_time,
    ));
    add_hours(break_time, BREAK_DUR_H)
}

pub struct PlannerInput<'a> {
    pub route: &'a Route,
    pub locations: &'a [Location],
    /// Geocoded display name per location, aligned by index; `None` falls
    /// back to `"<Type> Location"`.
    pub location_names: &'a [Option<String>],
    pub start_time: NaiveDateTime,
    pub cycle_used_hours: f64,
}

/// Produces the ordered stop list obeying Hours-of-Service constraints for a
/// trip through `locations[0]` (current position) -> `locations[1]`
/// (pickup) -> ... -> `locations[last]` (dropoff).
pub fn generate_stops(input: PlannerInput) -> Vec<Stop> {
    let PlannerInput {
        route,
        locations,
        location_names,
        start_time,
        cycle_used_hours,
    } = input;

    let n = locations.len();
    assert!(n >= 2, "a trip needs at least an origin and a destination");

    let total_mi = route.distance;
    let mut stops = Vec::new();
    let mut now = start_time;
    let mut position_mi = 0.0_f64;
    let mut miles_since_fuel = 0.0_f64;
    let mut hours_since_break = cycle_used_hours;
    // Only the very first early-morning check (before any driving) needs to
    // distinguish "off-duty" from "sleeper-berth": every later rest period
    // is produced by `handle_end_of_day`, which always labels it sleeper
    // berth regardless of day count.
    let first_day = true;

    stops.push(Stop::new(
        StopType::Start,
        "Trip Start",
        locations[0].to_coord(),
        "0 min",
        now,
    ));

    if hour_of(now) < SLEEPER_END_H {
        let (stop_type, name) = if first_day {
            (StopType::OffDuty, "Early Morning Rest (Off-Duty)")
        } else {
            (StopType::Overnight, "Early Morning Rest (Sleeper Berth)")
        };
        stops.push(Stop::new(
            stop_type,
            name,
            locations[0].to_coord(),
            format_span(now, SLEEPER_END_H),
            now,
        ));
        now = at_hour(now, SLEEPER_END_H);
    }

    if hour_of(now) >= PRE_TRIP_H && hour_of(now) < DRIVE_START_H {
        stops.push(Stop::new(
            StopType::Pretrip,
            "Pre-Trip Inspection",
            locations[0].to_coord(),
            "30 min",
            now,
        ));
        now = at_hour(now, DRIVE_START_H);
    }

    // If the clock is still outside the driving window at this point it can
    // only be because the trip started late in the day (everything earlier
    // than the pre-trip window was already handled above): bridge to the
    // next morning with an explicit overnight rest rather than silently
    // jumping the clock.
    if hour_of(now) >= DRIVE_END_H {
        let target = next_day_at(now, DRIVE_START_H);
        stops.push(Stop::new(
            StopType::Overnight,
            "Required 10-Hour Rest",
            locations[0].to_coord(),
            format_duration_between(now, target),
            now,
        ));
        now = target;
    } else {
        now = next_drive_start(now);
    }

    for i in 1..n {
        let target_mi = total_mi * (i as f64) / ((n - 1) as f64);
        let mut remaining_drive_mi = target_mi - position_mi;

        while remaining_drive_mi > EPS {
            let coord = route.interpolate(safe_frac(position_mi, total_mi));

            if hours_until_end_of_day(now) <= EPS {
                now = handle_end_of_day(&mut stops, coord, now);
                hours_since_break = 0.0;
                continue;
            }

            if hours_since_break >= BREAK_TRIGGER_H - EPS {
                now = insert_break(&mut stops, coord, now);
                hours_since_break = 0.0;
                continue;
            }

            let drivable_h = (remaining_drive_mi / AVG_SPEED_MPH)
                .min(hours_until_end_of_day(now))
                .min(BREAK_TRIGGER_H - hours_since_break);

            if drivable_h <= EPS {
                now = insert_break(&mut stops, coord, now);
                hours_since_break = 0.0;
                continue;
            }

            let miles_to_fuel = FUEL_INTERVAL_MI - miles_since_fuel;
            if miles_to_fuel > EPS && drivable_h * AVG_SPEED_MPH >= miles_to_fuel {
                let hours_to_fuel = miles_to_fuel / AVG_SPEED_MPH;
                position_mi += miles_to_fuel;
                remaining_drive_mi -= miles_to_fuel;
                let arrival = drive_with_clamp(now, hours_to_fuel);
                let fuel_coord = route.interpolate(safe_frac(position_mi, total_mi));
                stops.push(Stop::new(StopType::Fuel, "Fuel Stop", fuel_coord, "30 min", arrival));
                now = add_hours(arrival, STOP_DUR_H);
                miles_since_fuel = 0.0;
                hours_since_break += hours_to_fuel;
                if hours_since_break >= 7.0 {
                    now = insert_break(&mut stops, fuel_coord, now);
                    hours_since_break = 0.0;
                }
                continue;
            }

            if hours_since_break + drivable_h >= BREAK_TRIGGER_H - EPS
                && BREAK_TRIGGER_H - hours_since_break > EPS
            {
                let drive_h = BREAK_TRIGGER_H - hours_since_break;
                let miles = drive_h * AVG_SPEED_MPH;
                position_mi += miles;
                remaining_drive_mi -= miles;
                miles_since_fuel += miles;
                let arrival = drive_with_clamp(now, drive_h);
                let break_coord = route.interpolate(safe_frac(position_mi, total_mi));
                let break_time = align_break(arrival);
                stops.push(Stop::new(
                    StopType::Rest,
                    "30-Minute Break",
                    break_coord,
                    "30 min",
                    break_time,
                ));
                now = add_hours(break_time, BREAK_DUR_H);
                hours_since_break = 0.0;
                continue;
            }

            let miles = drivable_h * AVG_SPEED_MPH;
            position_mi += miles;
            remaining_drive_mi -= miles;
            miles_since_fuel += miles;
            hours_since_break += drivable_h;
            now = drive_with_clamp(now, drivable_h);

            if hours_until_end_of_day(now) <= EPS && remaining_drive_mi > EPS {
                let end_coord = route.interpolate(safe_frac(position_mi, total_mi));
                now = handle_end_of_day(&mut stops, end_coord, now);
                hours_since_break = 0.0;
            }
        }

        position_mi = target_mi;
        let stop_type = if i == 1 {
            StopType::Pickup
        } else if i == n - 1 {
            StopType::Dropoff
        } else {
            StopType::Waypoint
        };
        let name = location_names
            .get(i)
            .and_then(|n| n.clone())
            .unwrap_or_else(|| format!("{stop_type:?} Location"));
        stops.push(Stop::new(stop_type, name, locations[i].to_coord(), "30 min", now));
        now = add_hours(now, STOP_DUR_H);
    }

    stops.sort_by_key(|s| s.estimated_arrival);
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn short_route(distance: f64) -> Route {
        Route {
            coordinates: vec![
                crate::models::Coord([-118.25, 34.05]),
                crate::models::Coord([-118.20, 34.10]),
            ],
            distance,
            duration: distance / AVG_SPEED_MPH * 3600.0,
            pickup_coord: crate::models::Coord([-118.25, 34.05]),
            dropoff_coord: crate::models::Coord([-118.20, 34.10]),
        }
    }

    fn loc(lat: f64, lng: f64) -> Location {
        Location { lat, lng }
    }

    #[test]
    fn degenerate_same_point_trip_emits_core_stops_same_day() {
        let route = short_route(0.0);
        let locations = vec![loc(34.05, -118.25), loc(34.05, -118.25), loc(34.05, -118.25)];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 6, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 0.0,
        });

        let types: Vec<StopType> = stops.iter().map(|s| s.stop_type).collect();
        assert!(types.contains(&StopType::Start));
        assert!(types.contains(&StopType::Pretrip));
        assert!(types.contains(&StopType::Pickup));
        assert!(types.contains(&StopType::Dropoff));
        assert!(stops.iter().all(|s| s.estimated_arrival.date() == start.date()));
    }

    #[test]
    fn stops_are_sorted_by_arrival() {
        let route = short_route(600.0);
        let locations = vec![loc(34.05, -118.25), loc(34.05, -118.25), loc(36.17, -115.14)];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 6, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 0.0,
        });
        let mut sorted = stops.clone();
        sorted.sort_by_key(|s| s.estimated_arrival);
        let actual: Vec<_> = stops.iter().map(|s| s.estimated_arrival).collect();
        let expected: Vec<_> = sorted.iter().map(|s| s.estimated_arrival).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn long_trip_inserts_fuel_and_rest_stops() {
        // ~2800 miles, roughly New York -> Los Angeles driving distance.
        let route = short_route(2800.0);
        let locations = vec![
            loc(40.71, -74.00),
            loc(40.71, -74.00),
            loc(34.05, -118.25),
        ];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 6, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 0.0,
        });

        let fuel_count = stops.iter().filter(|s| s.stop_type == StopType::Fuel).count();
        let overnight_count = stops.iter().filter(|s| s.stop_type == StopType::Overnight).count();
        assert!(fuel_count >= 5, "expected several fuel stops, got {fuel_count}");
        assert!(overnight_count >= 1, "expected at least one overnight rest");
    }

    #[test]
    fn cycle_used_hours_triggers_early_break() {
        let route = short_route(300.0);
        let locations = vec![loc(40.71, -74.00), loc(40.71, -74.00), loc(41.5, -74.5)];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 6, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 7.5,
        });
        assert!(stops.iter().any(|s| s.stop_type == StopType::Rest));
    }

    #[test]
    fn late_start_defers_driving_to_next_morning() {
        let route = short_route(60.0);
        let locations = vec![loc(34.05, -118.25), loc(34.05, -118.25), loc(34.20, -118.35)];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 18, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 0.0,
        });
        assert!(stops.iter().any(|s| s.stop_type == StopType::Overnight));
        let dropoff = stops.iter().find(|s| s.stop_type == StopType::Dropoff).unwrap();
        assert!(dropoff.estimated_arrival.date() > start.date());
    }

    #[test]
    fn leg_terminal_name_falls_back_when_ungeocoded() {
        let route = short_route(10.0);
        let locations = vec![loc(34.05, -118.25), loc(34.05, -118.25), loc(34.06, -118.26)];
        let names = vec![None, None, None];
        let start = dt(2024, 6, 1, 6, 0);
        let stops = generate_stops(PlannerInput {
            route: &route,
            locations: &locations,
            location_names: &names,
            start_time: start,
            cycle_used_hours: 0.0,
        });
        let dropoff = stops.iter().find(|s| s.stop_type == StopType::Dropoff).unwrap();
        assert_eq!(dropoff.name, "Dropoff Location");
    }
}
