// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::Coordinate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const COL_AIRPORT_NAME: &str = "Airport";
pub const COL_ICAO_CODE: &str = "ICAO Code";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_DIRECTION: &str = "Direction";
pub const COL_NEAREST_AIRPORTS: &str = "Nearest Airports";

/// One label/value cell of a source row, kept in source column order.
pub type Field = (String, String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub icao_code: String,
    pub position: Coordinate,
    /// Every source column, including the ones above.
    pub fields: Vec<Field>,
}

impl Airport {
    pub fn new(name: &str, icao_code: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            icao_code: icao_code.to_string(),
            position: Coordinate { lat, lon },
            fields: vec![
                (COL_AIRPORT_NAME.to_string(), name.to_string()),
                (COL_ICAO_CODE.to_string(), icao_code.to_string()),
                (COL_LATITUDE.to_string(), lat.to_string()),
                (COL_LONGITUDE.to_string(), lon.to_string()),
            ],
        }
    }

    pub fn with_field(mut self, label: &str, value: &str) -> Self {
        self.fields.push((label.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestAirportEntry {
    pub icao_code: String,
    pub distance_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub position: Coordinate,
    /// Heading in degrees, 0-360, clockwise from north.
    pub direction: f64,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub nearest_airports: Vec<NearestAirportEntry>,
    #[serde(default)]
    pub nearest_summary: Option<String>,
}

impl Flight {
    pub fn new(flight_number: &str, lat: f64, lon: f64, direction: f64) -> Self {
        Self {
            flight_number: flight_number.to_string(),
            position: Coordinate { lat, lon },
            direction,
            fields: vec![
                (COL_FLIGHT_NUMBER.to_string(), flight_number.to_string()),
                (COL_LATITUDE.to_string(), lat.to_string()),
                (COL_LONGITUDE.to_string(), lon.to_string()),
                (COL_DIRECTION.to_string(), direction.to_string()),
            ],
            nearest_airports: Vec::new(),
            nearest_summary: None,
        }
    }

    pub fn with_field(mut self, label: &str, value: &str) -> Self {
        self.fields.push((label.to_string(), value.to_string()));
        self
    }

    /// Source columns followed by the nearest-airport summary once annotated.
    pub fn display_fields(&self) -> Vec<Field> {
        let mut fields = self.fields.clone();
        if let Some(summary) = &self.nearest_summary {
            fields.push((COL_NEAREST_AIRPORTS.to_string(), summary.clone()));
        }
        fields
    }
}

/// Ordered, read-only airport and flight tables.
#[derive(Debug, Clone, Default)]
pub struct GeoStore {
    airports: Vec<Airport>,
    flights: Vec<Flight>,
}

impl GeoStore {
    /// Builds a store, dropping any record whose coordinates are out of range.
    pub fn new(airports: Vec<Airport>, flights: Vec<Flight>) -> Self {
        let airport_total = airports.len();
        let flight_total = flights.len();

        let airports: Vec<Airport> = airports
            .into_iter()
            .filter(|a| match a.position.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Excluding airport {} — {}", a.icao_code, e);
                    false
                }
            })
            .collect();

        let flights: Vec<Flight> = flights
            .into_iter()
            .filter(|f| match f.position.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Excluding flight {} — {}", f.flight_number, e);
                    false
                }
            })
            .collect();

        info!(
            "Loaded store — airports={}/{} flights={}/{}",
            airports.len(),
            airport_total,
            flights.len(),
            flight_total
        );

        Self { airports, flights }
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Returns a new store holding the same airports and the given flights.
    pub fn with_flights(&self, flights: Vec<Flight>) -> Self {
        Self {
            airports: self.airports.clone(),
            flights,
        }
    }
}
