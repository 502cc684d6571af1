use super::coordinates::Coordinates;
use serde::Serialize;

/// Per-club attendance window.
///
/// The anchor is only meaningful while `accepting` is true: each toggle-on
/// overwrites it, and check-ins measure against it until the next toggle-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub club_id: i64,
    pub accepting: bool,
    pub anchor: Coordinates,
    pub updated_at: String,
}
