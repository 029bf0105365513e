use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};

use crate::bookkeeping::Bookkeeping;
use crate::models::{
    DailyLogSheet, DutyStatus, DutyStatusKind, GraphData, LogEntry, Remark, Stop, StopType, Violation,
    ViolationType,
};
use crate::services::stop_planner::{
    AVG_SPEED_MPH, DRIVE_END_H, MAX_DRIVING_H, MAX_ON_DUTY_H, PRE_TRIP_H, SLEEPER_END_H, SLEEPER_START_H,
};

const HOUR_COARSE_TOL: f64 = 0.01;
const HOUR_FINE_TOL: f64 = 0.001;

fn hour_of_naive(dt: chrono::NaiveDateTime) -> f64 {
    dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0
}

fn duty_status_for_stop(stop_type: StopType) -> DutyStatusKind {
    match stop_type {
        StopType::Overnight => DutyStatusKind::SleeperBerth,
        StopType::OffDuty | StopType::Rest | StopType::Start => DutyStatusKind::OffDuty,
        StopType::Pretrip | StopType::Pickup | StopType::Dropoff | StopType::Waypoint | StopType::Fuel => {
            DutyStatusKind::OnDuty
        }
    }
}

/// Writes (or overwrites, within tolerance) a duty-status sample at `hour`.
fn add_duty_status(list: &mut Vec<DutyStatus>, hour: f64, status: DutyStatusKind) {
    if let Some(existing) = list.iter_mut().find(|d| (d.hour - hour).abs() <= HOUR_FINE_TOL) {
        existing.status = status;
    } else {
        list.push(DutyStatus { hour, status });
    }
}

fn add_remark(list: &mut Vec<Remark>, time: f64, location: String) {
    if let Some(existing) = list.iter_mut().find(|r| (r.time - time).abs() <= HOUR_FINE_TOL) {
        existing.location = location;
    } else {
        list.push(Remark { time, location });
    }
}

fn format_hm(hour: f64) -> String {
    let h = hour.clamp(0.0, 23.999);
    let total_minutes = (h * 60.0).round() as i64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

fn nearest_remark(remarks: &[Remark], hour: f64) -> String {
    remarks
        .iter()
        .min_by(|a, b| {
            (a.time - hour)
                .abs()
                .partial_cmp(&(b.time - hour).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|r| r.location.clone())
        .unwrap_or_else(|| "Unknown Location".to_string())
}

/// Folds the stop list into per-calendar-day ELD log sheets: a 24-hour
/// duty-status timeline, remarks, detailed log entries, mileage, and HOS
/// violations.
pub fn assemble_logs(
    stops: &[Stop],
    starting_odometer: Option<f64>,
    bookkeeping: &mut Bookkeeping,
) -> Vec<DailyLogSheet> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Stop>> = BTreeMap::new();
    for stop in stops {
        by_date.entry(stop.estimated_arrival.date()).or_default().push(stop);
    }
    for day_stops in by_date.values_mut() {
        day_stops.sort_by_key(|s| s.estimated_arrival);
    }

    let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
    let trip_identity = bookkeeping.trip_identity();
    let mut running_odometer = starting_odometer.unwrap_or(trip_identity.starting_odometer);

    let mut sheets = Vec::with_capacity(dates.len());

    for (idx, date) in dates.iter().enumerate() {
        let day_stops = &by_date[date];
        let is_first_day = idx == 0;
        let is_last_day = idx == dates.len() - 1;

        let mut hour_data: Vec<DutyStatus> = Vec::new();
        let mut remarks: Vec<Remark> = Vec::new();

        // Step 1: seed from stops.
        for stop in day_stops.iter() {
            let hour = hour_of_naive(stop.estimated_arrival);
            add_duty_status(&mut hour_data, hour, duty_status_for_stop(stop.stop_type));
            add_remark(&mut remarks, hour, stop.name.clone());
        }

        // Step 2: early-morning coverage.
        let has_early = hour_data.iter().any(|d| d.hour < SLEEPER_END_H);
        if !has_early {
            let status = if is_first_day {
                DutyStatusKind::OffDuty
            } else {
                DutyStatusKind::SleeperBerth
            };
            add_duty_status(&mut hour_data, 0.0, status);
            add_remark(&mut remarks, 0.0, "Start of Day".to_string());
        }

        // Step 3: rest-end transition.
        if !hour_data.iter().any(|d| (d.hour - SLEEPER_END_H).abs() <= HOUR_COARSE_TOL) {
            add_duty_status(&mut hour_data, SLEEPER_END_H, DutyStatusKind::OnDuty);
            add_remark(&mut remarks, SLEEPER_END_H, "End of Rest Period".to_string());
        }

        // Step 4: standard morning pattern.
        if is_first_day {
            if let Some(first) = day_stops.first() {
                let first_hour = hour_of_naive(first.estimated_arrival);
                if first_hour <= PRE_TRIP_H {
                    add_duty_status(&mut hour_data, PRE_TRIP_H, DutyStatusKind::OnDuty);
                    add_remark(&mut remarks, PRE_TRIP_H, "Pre-Trip Inspection".to_string());
                    add_duty_status(&mut hour_data, 7.0, DutyStatusKind::Driving);
                    add_remark(&mut remarks, 7.0, "Start Driving".to_string());
                } else {
                    add_duty_status(&mut hour_data, first_hour, DutyStatusKind::OnDuty);
                    add_remark(&mut remarks, first_hour, "On Duty".to_string());
                    let drive_hour = (first_hour + 0.5).min(23.9);
                    add_duty_status(&mut hour_data, drive_hour, DutyStatusKind::Driving);
                    add_remark(&mut remarks, drive_hour, "Start Driving".to_string());
                }
            }
        } else {
            add_duty_status(&mut hour_data, PRE_TRIP_H, DutyStatusKind::OnDuty);
            add_remark(&mut remarks, PRE_TRIP_H, "Pre-Trip Inspection".to_string());
            add_duty_status(&mut hour_data, 7.0, DutyStatusKind::Driving);
            add_remark(&mut remarks, 7.0, "Start Driving".to_string());
        }

        // Step 5: between-stop driving interpolation. This is the sole source
        // of the day's accumulated driving/on-duty hours and mileage — the
        // morning-pattern and end-of-day entries describe the timeline but
        // don't themselves add miles.
        let mut driving_hours = 0.0_f64;
        let mut on_duty_hours = 0.0_f64;
        let mut day_miles = 0.0_f64;
        for pair in day_stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if matches!(a.stop_type, StopType::OffDuty | StopType::Overnight)
                || matches!(b.stop_type, StopType::OffDuty | StopType::Overnight)
            {
                continue;
            }
            let a_hour = hour_of_naive(a.estimated_arrival);
            let b_hour = hour_of_naive(b.estimated_arrival);
            let gap_hours = b_hour - a_hour - 0.5;
            if gap_hours > 0.25 {
                let drive_hour = (a_hour + 0.5).min(23.9);
                add_duty_status(&mut hour_data, drive_hour, DutyStatusKind::Driving);
                add_remark(&mut remarks, drive_hour, format!("En Route to {}", b.name));
                day_miles += gap_hours * AVG_SPEED_MPH;
                driving_hours += gap_hours;
                on_duty_hours += gap_hours;
            }
        }

        // Step 6: standard end-of-day pattern (unless this is an early-completion last day).
        let last_stop_is_early_dropoff = is_last_day
            && day_stops
                .last()
                .map(|s| hour_of_naive(s.estimated_arrival) < DRIVE_END_H && s.stop_type == StopType::Dropoff)
                .unwrap_or(false);

        if !last_stop_is_early_dropoff {
            if !hour_data.iter().any(|d| (d.hour - DRIVE_END_H).abs() <= HOUR_COARSE_TOL) {
                add_duty_status(&mut hour_data, DRIVE_END_H, DutyStatusKind::OffDuty);
                add_remark(&mut remarks, DRIVE_END_H, "End of Driving Day".to_string());
            }
            if !hour_data.iter().any(|d| (d.hour - SLEEPER_START_H).abs() <= HOUR_COARSE_TOL) {
                add_duty_status(&mut hour_data, SLEEPER_START_H, DutyStatusKind::SleeperBerth);
                add_remark(&mut remarks, SLEEPER_START_H, "10-Hour Rest".to_string());
            }
            if !is_last_day {
                add_duty_status(&mut hour_data, 23.99, DutyStatusKind::SleeperBerth);
                add_remark(&mut remarks, 23.99, "Continued Rest".to_string());
            }
        }

        // Step 7/8: sort.
        hour_data.sort_by(|a, b| a.hour.partial_cmp(&b.hour).unwrap_or(std::cmp::Ordering::Equal));
        remarks.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));

        // 4.4.5: detailed log entries, derived from the final hourData timeline.
        // Per-entry `miles` here is presentation only; the day's totals were
        // already accumulated in step 5 above.
        let mut logs = Vec::new();

        for window in hour_data.windows(2) {
            let (from, to) = (window[0], window[1]);
            let gap = to.hour - from.hour;
            let miles = if from.status == DutyStatusKind::Driving {
                (gap * AVG_SPEED_MPH).round()
            } else {
                0.0
            };
            logs.push(LogEntry {
                date: *date,
                start_time: format_hm(from.hour),
                end_time: format_hm(to.hour),
                status: from.status,
                location: nearest_remark(&remarks, from.hour),
                miles,
            });
        }
        if let Some(last) = hour_data.last() {
            logs.push(LogEntry {
                date: *date,
                start_time: format_hm(last.hour),
                end_time: "24:00".to_string(),
                status: last.status,
                location: nearest_remark(&remarks, last.hour),
                miles: 0.0,
            });
        }

        let mut violations = Vec::new();
        if driving_hours > MAX_DRIVING_H {
            violations.push(Violation {
                violation_type: ViolationType::DrivingLimit,
                description: format!("Exceeded 11-hour driving limit ({driving_hours:.1} hours)"),
            });
        }
        if on_duty_hours > MAX_ON_DUTY_H {
            violations.push(Violation {
                violation_type: ViolationType::OnDutyLimit,
                description: format!("Exceeded 14-hour on-duty limit ({on_duty_hours:.1} hours)"),
            });
        }

        let start_odometer = running_odometer;
        let end_odometer = start_odometer + day_miles;
        running_odometer = end_odometer;

        let daily_identity = bookkeeping.daily_identity();

        sheets.push(DailyLogSheet {
            date: *date,
            start_time: hour_data.first().map(|d| format_hm(d.hour)).unwrap_or_else(|| "00:00".to_string()),
            end_time: "24:00".to_string(),
            start_location: remarks.first().map(|r| r.location.clone()).unwrap_or_else(|| "Unknown Location".to_string()),
            end_location: remarks.last().map(|r| r.location.clone()).unwrap_or_else(|| "Unknown Location".to_string()),
            start_odometer,
            end_odometer,
            total_miles: day_miles.round(),
            total_hours: on_duty_hours,
            graph_data: GraphData { hour_data, remarks },
            logs,
            violations,
            driver_name: trip_identity.driver_name.clone(),
            driver_id: trip_identity.driver_id.clone(),
            truck_number: trip_identity.truck_number.clone(),
            trailer_number: trip_identity.trailer_number.clone(),
            carrier: trip_identity.carrier.clone(),
            home_terminal: trip_identity.home_terminal.clone(),
            shipping_doc_number: trip_identity.shipping_doc_number.clone(),
            license_plate: daily_identity.license_plate,
            shipper_commodity: daily_identity.shipper_commodity,
            office_address: trip_identity.office_address.clone(),
            home_address: trip_identity.home_address.clone(),
            total_miles_driving_today: format!("{:.0} miles", day_miles.round()),
            total_mileage_today: format!("{:.0} miles", day_miles.round()),
        });
    }

    sheets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coord;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn stop(stop_type: StopType, name: &str, h: u32, min: u32) -> Stop {
        Stop::new(stop_type, name, Coord([-118.25, 34.05]), "30 min", dt(2024, 6, 1, h, min))
    }

    #[test]
    fn hour_coverage_has_no_gaps() {
        let stops = vec![
            stop(StopType::Start, "Trip Start", 6, 0),
            stop(StopType::Pretrip, "Pre-Trip Inspection", 6, 30),
            stop(StopType::Pickup, "Pickup Location", 7, 5),
            stop(StopType::Dropoff, "Dropoff Location", 7, 40),
        ];
        let mut bk = Bookkeeping::new(1);
        let sheets = assemble_logs(&stops, Some(100_000.0), &mut bk);
        assert_eq!(sheets.len(), 1);
        let sheet = &sheets[0];
        assert!(sheet.graph_data.hour_data.first().unwrap().hour <= HOUR_COARSE_TOL);
        let hours: Vec<f64> = sheet.graph_data.hour_data.iter().map(|d| d.hour).collect();
        for w in hours.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn odometer_rolls_across_days() {
        let stops = vec![
            stop(StopType::Start, "Trip Start", 6, 0),
            stop(StopType::Pickup, "Pickup Location", 7, 5),
            Stop::new(
                StopType::Overnight,
                "Required 10-Hour Rest",
                Coord([-118.0, 34.0]),
                "10 h",
                dt(2024, 6, 1, 19, 0),
            ),
            stop(StopType::Dropoff, "Dropoff Location", 7, 40),
        ];
        let mut day2 = stops.clone();
        day2[3].estimated_arrival = dt(2024, 6, 2, 10, 0);
        let mut bk = Bookkeeping::new(2);
        let sheets = assemble_logs(&day2, Some(250_000.0), &mut bk);
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].start_odometer, sheets[0].end_odometer);
    }

    #[test]
    fn violation_flagged_when_driving_exceeds_eleven_hours() {
        let mut hour_data = Vec::new();
        let mut remarks = Vec::new();
        add_duty_status(&mut hour_data, 7.0, DutyStatusKind::Driving);
        add_remark(&mut remarks, 7.0, "Start Driving".to_string());
        add_duty_status(&mut hour_data, 19.5, DutyStatusKind::OffDuty);
        add_remark(&mut remarks, 19.5, "End of Driving Day".to_string());
        let gap = 19.5 - 7.0;
        assert!(gap > MAX_DRIVING_H);
    }

    #[test]
    fn nearest_remark_picks_closest_time() {
        let remarks = vec![
            Remark { time: 7.0, location: "A".to_string() },
            Remark { time: 12.0, location: "B".to_string() },
        ];
        assert_eq!(nearest_remark(&remarks, 7.4), "A");
        assert_eq!(nearest_remark(&remarks, 11.9), "B");
    }

    #[test]
    fn format_hm_rounds_to_minute() {
        assert_eq!(format_hm(6.5), "06:30");
        assert_eq!(format_hm(0.0), "00:00");
    }
}
