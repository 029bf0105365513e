pub mod geo;
pub mod log;
pub mod route;
pub mod stop;
pub mod trip;

pub use geo::{Coord, Location};
pub use log::{DailyLogSheet, DutyStatus, DutyStatusKind, GraphData, LogEntry, Remark, Violation, ViolationType};
pub use route::{Route, RouteSegment};
pub use stop::{Stop, StopType};
pub use trip::{LatLng, LocationWrapper, TripData, TripRequest, TripResponse};
