use super::member::Member;
use serde::Serialize;

/// Result of a check-in attempt. A geofence rejection is a normal outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// Inside the geofence: the member's counter was incremented.
    Accepted { member: Member, distance_m: f64 },
    /// Outside the geofence: nothing was written.
    Rejected { distance_m: f64, radius_m: f64 },
    /// The club's session exists but is not accepting check-ins.
    Closed,
}
