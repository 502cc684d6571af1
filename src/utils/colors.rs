/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Open session → green, closed → red.
pub fn color_for_flag(accepting: bool) -> &'static str {
    if accepting { GREEN } else { RED }
}

/// Distance color:
/// inside the fence → green
/// up to twice the radius → yellow
/// farther → red
pub fn color_for_distance(distance_m: f64, radius_m: f64) -> &'static str {
    if distance_m <= radius_m {
        GREEN
    } else if distance_m <= radius_m * 2.0 {
        YELLOW
    } else {
        RED
    }
}

/// Grey placeholder for missing values.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}
