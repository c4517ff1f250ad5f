// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Nearest-airport lookup for flights.
//!
//! Brute force over every airport per flight, O(F·A log A). A spatial index
//! would slot in behind [`ProximityIndex`] without changing
//! [`compute_nearest`].

use crate::error::GeoError;
use crate::geo::Coordinate;
use crate::store::{Airport, Flight, NearestAirportEntry};
use rayon::prelude::*;

pub const DEFAULT_NEAREST_COUNT: usize = 3;

/// Upper bound on the annotated list length per flight.
pub const MAX_NEAREST_COUNT: usize = 3;

pub struct ProximityIndex<'a> {
    airports: &'a [Airport],
}

impl<'a> ProximityIndex<'a> {
    /// Validates every airport coordinate up front.
    pub fn new(airports: &'a [Airport]) -> Result<Self, GeoError> {
        for airport in airports {
            airport.position.validate()?;
        }
        Ok(Self { airports })
    }

    /// The `k` nearest airports to `position`, ascending by distance.
    /// Equal distances keep airport table order.
    pub fn nearest_to(
        &self,
        position: &Coordinate,
        k: usize,
    ) -> Result<Vec<NearestAirportEntry>, GeoError> {
        position.validate()?;

        let mut ranked: Vec<(usize, f64)> = self
            .airports
            .iter()
            .enumerate()
            .map(|(i, a)| (i, position.distance_nm(&a.position)))
            .collect();
        // sort_by is stable, which is what keeps ties in input order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(i, distance_nm)| NearestAirportEntry {
                icao_code: self.airports[i].icao_code.clone(),
                distance_nm,
            })
            .collect())
    }

    pub fn nearest(&self, flight: &Flight, k: usize) -> Result<Vec<NearestAirportEntry>, GeoError> {
        self.nearest_to(&flight.position, k)
    }
}

/// Nearest-airport lists for every flight, aligned by index with `flights`.
///
/// Flight numbers are not unique, so the flight's position in the input is
/// its key. Fails on the first record with an out-of-range coordinate.
pub fn compute_nearest(
    flights: &[Flight],
    airports: &[Airport],
    k: usize,
) -> Result<Vec<Vec<NearestAirportEntry>>, GeoError> {
    let index = ProximityIndex::new(airports)?;
    flights
        .par_iter()
        .map(|flight| index.nearest(flight, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_nm;

    fn nyc_airports() -> Vec<Airport> {
        vec![
            Airport::new("John F Kennedy Intl", "KJFK", 40.64, -73.78),
            Airport::new("La Guardia", "KLGA", 40.77, -73.87),
            Airport::new("Newark Liberty Intl", "KEWR", 40.69, -74.17),
        ]
    }

    #[test]
    fn test_nyc_scenario_ordering() {
        let airports = nyc_airports();
        let flights = vec![Flight::new("AA100", 40.70, -74.00, 45.0)];

        let nearest = compute_nearest(&flights, &airports, 3).unwrap();
        assert_eq!(nearest.len(), 1);

        let list = &nearest[0];
        assert_eq!(list.len(), 3);
        let codes: Vec<&str> = list.iter().map(|e| e.icao_code.as_str()).collect();
        assert_eq!(codes, vec!["KLGA", "KEWR", "KJFK"]);

        // Reference values for this geometry
        assert!((list[0].distance_nm - 7.26).abs() < 0.05, "{:?}", list);
        assert!((list[1].distance_nm - 7.76).abs() < 0.05, "{:?}", list);
        assert!((list[2].distance_nm - 10.65).abs() < 0.05, "{:?}", list);
    }

    #[test]
    fn test_distances_match_haversine() {
        let airports = nyc_airports();
        let flight = Flight::new("DL5", 41.2, -72.9, 270.0);
        let index = ProximityIndex::new(&airports).unwrap();

        let list = index.nearest(&flight, 3).unwrap();
        for entry in &list {
            let apt = airports
                .iter()
                .find(|a| a.icao_code == entry.icao_code)
                .unwrap();
            let expected = haversine_nm(41.2, -72.9, apt.position.lat, apt.position.lon);
            assert!((entry.distance_nm - expected).abs() < 1e-9);
        }
        assert!(list.windows(2).all(|w| w[0].distance_nm <= w[1].distance_nm));
    }

    #[test]
    fn test_k_larger_than_airport_count() {
        let airports = vec![Airport::new("Kennedy", "KJFK", 40.64, -73.78)];
        let flights = vec![Flight::new("AA1", 40.0, -74.0, 0.0)];
        let nearest = compute_nearest(&flights, &airports, 3).unwrap();
        assert_eq!(nearest[0].len(), 1);
    }

    #[test]
    fn test_empty_airports_gives_empty_lists() {
        let flights = vec![
            Flight::new("AA1", 40.0, -74.0, 0.0),
            Flight::new("AA2", 10.0, 10.0, 0.0),
        ];
        let nearest = compute_nearest(&flights, &[], 3).unwrap();
        assert_eq!(nearest.len(), 2);
        assert!(nearest.iter().all(|l| l.is_empty()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Two airports at the same spot: the first listed wins
        let airports = vec![
            Airport::new("Second Name", "BBBB", 10.0, 10.0),
            Airport::new("First Name", "AAAA", 10.0, 10.0),
            Airport::new("Far", "CCCC", 20.0, 20.0),
        ];
        let flights = vec![Flight::new("X1", 10.5, 10.0, 0.0)];
        let nearest = compute_nearest(&flights, &airports, 3).unwrap();
        let codes: Vec<&str> = nearest[0].iter().map(|e| e.icao_code.as_str()).collect();
        assert_eq!(codes, vec!["BBBB", "AAAA", "CCCC"]);
    }

    #[test]
    fn test_invalid_coordinates_fail() {
        let airports = vec![Airport::new("Broken", "ZZZZ", -91.0, 0.0)];
        assert!(matches!(
            compute_nearest(&[], &airports, 3),
            Err(GeoError::InvalidCoordinate { .. })
        ));

        let airports = nyc_airports();
        let flights = vec![Flight::new("BAD", 0.0, 181.0, 0.0)];
        assert_eq!(
            compute_nearest(&flights, &airports, 3),
            Err(GeoError::InvalidCoordinate { lat: 0.0, lon: 181.0 })
        );
    }

    #[test]
    fn test_output_follows_flight_order() {
        let airports = nyc_airports();
        let flights: Vec<Flight> = (0..50)
            .map(|i| Flight::new(&format!("F{}", i), 40.0 + i as f64 * 0.1, -74.0, 0.0))
            .collect();
        let nearest = compute_nearest(&flights, &airports, 3).unwrap();
        for (flight, list) in flights.iter().zip(&nearest) {
            let index = ProximityIndex::new(&airports).unwrap();
            assert_eq!(&index.nearest(flight, 3).unwrap(), list);
        }
    }
}
