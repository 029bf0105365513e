use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatusKind {
    Driving,
    OnDuty,
    OffDuty,
    SleeperBerth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DutyStatus {
    pub hour: f64,
    pub status: DutyStatusKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Remark {
    pub time: f64,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub hour_data: Vec<DutyStatus>,
    pub remarks: Vec<Remark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationType {
    DrivingLimit,
    OnDutyLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: DutyStatusKind,
    pub location: String,
    pub miles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogSheet {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub start_location: String,
    pub end_location: String,
    pub start_odometer: f64,
    pub end_odometer: f64,
    pub total_miles: f64,
    pub total_hours: f64,
    pub graph_data: GraphData,
    pub logs: Vec<LogEntry>,
    pub violations: Vec<Violation>,

    // Bookkeeping / presentation fields, seeded per-request (see bookkeeping.rs).
    pub driver_name: String,
    pub driver_id: String,
    pub truck_number: String,
    pub trailer_number: String,
    pub carrier: String,
    pub home_terminal: String,
    pub shipping_doc_number: String,
    pub license_plate: String,
    pub shipper_commodity: String,
    pub office_address: String,
    pub home_address: String,
    pub total_miles_driving_today: String,
    pub total_mileage_today: String,
}
