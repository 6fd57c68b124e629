//! Great-circle distance between users and the shared display convention.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside ±90 / ±180 or non-finite.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when either component is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a pair only when both halves are present. Stored users may have
    /// neither, one, or both columns set.
    #[must_use]
    pub const fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance in kilometers. Inputs are not range-checked; `NaN`
/// propagates.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance as shown to users: whole meters below 1 km, one-decimal
/// kilometers from 1 km upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayDistance {
    Meters(u32),
    Kilometers(f64),
}

impl DisplayDistance {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_km(km: f64) -> Self {
        if km < 1.0 {
            Self::Meters((km * 1000.0).round().max(0.0) as u32)
        } else {
            Self::Kilometers((km * 10.0).round() / 10.0)
        }
    }
}

impl fmt::Display for DisplayDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters(m) => write!(f, "{m} m"),
            Self::Kilometers(km) => write!(f, "{km:.1} km"),
        }
    }
}
