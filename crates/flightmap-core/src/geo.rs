// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::GeoError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting anything outside [-90, 90] x [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        let c = Self { lat, lon };
        c.validate()?;
        Ok(c)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    pub fn distance_nm(&self, other: &Coordinate) -> f64 {
        haversine_nm(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Great-circle distance in nautical miles using the haversine formula.
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_NM * c
}

pub fn km_to_meters(km: f64) -> f64 {
    km * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_nm(40.64, -73.78, 40.64, -73.78), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // One degree of arc on the mean sphere is ~60 NM
        let d = haversine_nm(0.0, 0.0, 1.0, 0.0);
        assert!((d - 60.04).abs() < 0.05, "got {}", d);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_nm(51.47, -0.45, 40.64, -73.78);
        let b = haversine_nm(40.64, -73.78, 51.47, -0.45);
        assert!((a - b).abs() < 1e-9);
        // LHR-JFK is roughly 2990 NM
        assert!(a > 2950.0 && a < 3030.0, "got {}", a);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { lat: 91.0, lon: 0.0 })
        );
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_km_to_meters() {
        assert_eq!(km_to_meters(50.0), 50_000.0);
        assert_eq!(km_to_meters(0.5), 500.0);
    }
}
