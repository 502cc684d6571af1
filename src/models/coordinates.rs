use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse the textual form received from clients ("45.4642", "9.19").
    pub fn parse(latitude: &str, longitude: &str) -> AppResult<Self> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::InvalidCoordinate(format!("'{}' is not a latitude", latitude)))?;
        let lon = longitude.trim().parse::<f64>().map_err(|_| {
            AppError::InvalidCoordinate(format!("'{}' is not a longitude", longitude))
        })?;
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
