// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Operator filters: flight number, airport code and search radius.
//!
//! Filter text is matched as a literal, case-sensitive substring. A filter
//! that matches nothing hides its whole category rather than showing all.

use crate::error::FilterError;
use crate::geo::{km_to_meters, Coordinate};
use crate::store::{Airport, Flight};
use log::debug;
use serde::{Deserialize, Serialize};

/// Overview point used when nothing is selected.
pub const DEFAULT_CENTER: Coordinate = Coordinate { lat: 28.0, lon: 77.0 };

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub flight_number: Option<String>,
    pub airport_code: Option<String>,
    pub radius_km: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flight(mut self, substring: &str) -> Self {
        self.flight_number = non_blank(substring);
        self
    }

    pub fn airport(mut self, substring: &str) -> Self {
        self.airport_code = non_blank(substring);
        self
    }

    pub fn radius_km(mut self, km: f64) -> Self {
        self.radius_km = Some(km);
        self
    }

    /// Builds criteria from the raw text of the three operator controls.
    /// Blank inputs are treated as unset.
    pub fn from_inputs(flight: &str, airport: &str, radius: &str) -> Result<Self, FilterError> {
        let radius_km = match radius.trim() {
            "" => None,
            text => Some(text.parse::<f64>().map_err(|_| {
                FilterError::InvalidFilter(format!("radius '{}' is not a number", text))
            })?),
        };
        let criteria = Self {
            flight_number: non_blank(flight),
            airport_code: non_blank(airport),
            radius_km,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if let Some(r) = self.radius_km {
            if !r.is_finite() || r <= 0.0 {
                return Err(FilterError::InvalidFilter(format!(
                    "radius must be a positive number of kilometres, got {}",
                    r
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.flight_number.is_none() && self.airport_code.is_none() && self.radius_km.is_none()
    }
}

/// `None` for whitespace-only text; otherwise the text exactly as typed.
fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSpec {
    pub center: Coordinate,
    pub radius_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<'a> {
    pub visible_flights: Vec<&'a Flight>,
    pub visible_airports: Vec<&'a Airport>,
    pub center: Coordinate,
    pub overlay: Option<CircleSpec>,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterController {
    default_center: Coordinate,
}

impl Default for FilterController {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl FilterController {
    pub fn new(default_center: Coordinate) -> Self {
        Self { default_center }
    }

    pub fn apply<'a>(
        &self,
        criteria: &FilterCriteria,
        flights: &'a [Flight],
        airports: &'a [Airport],
    ) -> Result<FilterOutcome<'a>, FilterError> {
        criteria.validate()?;

        let visible_flights: Vec<&Flight> = match &criteria.flight_number {
            Some(s) => flights
                .iter()
                .filter(|f| f.flight_number.contains(s.as_str()))
                .collect(),
            None => flights.iter().collect(),
        };

        let visible_airports: Vec<&Airport> = match &criteria.airport_code {
            Some(s) => airports
                .iter()
                .filter(|a| a.icao_code.contains(s.as_str()))
                .collect(),
            None => airports.iter().collect(),
        };

        let first_flight_match = criteria
            .flight_number
            .as_ref()
            .and_then(|_| visible_flights.first())
            .map(|f| f.position);
        let first_airport_match = criteria
            .airport_code
            .as_ref()
            .and_then(|_| visible_airports.first())
            .map(|a| a.position);

        let center = first_flight_match
            .or(first_airport_match)
            .unwrap_or(self.default_center);

        let overlay = match (criteria.radius_km, first_flight_match) {
            (Some(km), Some(center)) => Some(CircleSpec {
                center,
                radius_m: km_to_meters(km),
            }),
            _ => None,
        };

        debug!(
            "Filter applied — flights={}/{} airports={}/{} center=({}, {}) overlay={}",
            visible_flights.len(),
            flights.len(),
            visible_airports.len(),
            airports.len(),
            center.lat,
            center.lon,
            overlay.is_some()
        );

        Ok(FilterOutcome {
            visible_flights,
            visible_airports,
            center,
            overlay,
        })
    }
}

/// Applies `criteria` with the built-in default center.
pub fn apply<'a>(
    criteria: &FilterCriteria,
    flights: &'a [Flight],
    airports: &'a [Airport],
) -> Result<FilterOutcome<'a>, FilterError> {
    FilterController::default().apply(criteria, flights, airports)
}
