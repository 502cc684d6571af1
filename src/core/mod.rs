pub mod backup;
pub mod checkin;
pub mod clubs;
pub mod export;
pub mod geofence;
pub mod log;
pub mod members;
pub mod session;
