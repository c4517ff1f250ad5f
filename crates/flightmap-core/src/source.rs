// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::SourceError;
use crate::geo::Coordinate;
use crate::store::{
    Airport, Field, Flight, COL_AIRPORT_NAME, COL_DIRECTION, COL_FLIGHT_NUMBER, COL_ICAO_CODE,
    COL_LATITUDE, COL_LONGITUDE,
};
use csv::StringRecord;
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};

pub trait DataSource {
    fn load_airports(&self) -> Result<Vec<Airport>, SourceError>;
    fn load_flights(&self) -> Result<Vec<Flight>, SourceError>;
}

/// Reads airports and flights from two CSV files with header rows.
///
/// Columns beyond the required ones are kept, in header order, for popups.
#[derive(Debug, Clone)]
pub struct CsvSource {
    airports_path: PathBuf,
    flights_path: PathBuf,
}

impl CsvSource {
    pub fn new<A: Into<PathBuf>, F: Into<PathBuf>>(airports_path: A, flights_path: F) -> Self {
        Self {
            airports_path: airports_path.into(),
            flights_path: flights_path.into(),
        }
    }

    pub fn parse_airports<R: Read>(reader: R, origin: &Path) -> Result<Vec<Airport>, SourceError> {
        let table = Table::read(reader, origin)?;
        let name = table.column(COL_AIRPORT_NAME)?;
        let icao = table.column(COL_ICAO_CODE)?;
        let lat = table.column(COL_LATITUDE)?;
        let lon = table.column(COL_LONGITUDE)?;

        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Airport {
                    name: row[name].clone(),
                    icao_code: row[icao].clone(),
                    position: Coordinate {
                        lat: table.number(row, lat, i)?,
                        lon: table.number(row, lon, i)?,
                    },
                    fields: table.fields(row),
                })
            })
            .collect()
    }

    pub fn parse_flights<R: Read>(reader: R, origin: &Path) -> Result<Vec<Flight>, SourceError> {
        let table = Table::read(reader, origin)?;
        let number = table.column(COL_FLIGHT_NUMBER)?;
        let lat = table.column(COL_LATITUDE)?;
        let lon = table.column(COL_LONGITUDE)?;
        let direction = table.column(COL_DIRECTION)?;

        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Flight {
                    flight_number: row[number].clone(),
                    position: Coordinate {
                        lat: table.number(row, lat, i)?,
                        lon: table.number(row, lon, i)?,
                    },
                    // Headings wrap into [0, 360)
                    direction: table.number(row, direction, i)?.rem_euclid(360.0),
                    fields: table.fields(row),
                    nearest_airports: Vec::new(),
                    nearest_summary: None,
                })
            })
            .collect()
    }
}

fn open(path: &Path) -> Result<std::fs::File, SourceError> {
    std::fs::File::open(path).map_err(|e| SourceError::unavailable(path, e.to_string()))
}

impl DataSource for CsvSource {
    fn load_airports(&self) -> Result<Vec<Airport>, SourceError> {
        let airports = Self::parse_airports(open(&self.airports_path)?, &self.airports_path)?;
        info!(
            "Read airport table — path={} rows={}",
            self.airports_path.display(),
            airports.len()
        );
        Ok(airports)
    }

    fn load_flights(&self) -> Result<Vec<Flight>, SourceError> {
        let flights = Self::parse_flights(open(&self.flights_path)?, &self.flights_path)?;
        info!(
            "Read flight table — path={} rows={}",
            self.flights_path.display(),
            flights.len()
        );
        Ok(flights)
    }
}

/// A whole CSV table as trimmed strings.
struct Table {
    origin: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn read<R: Read>(reader: R, origin: &Path) -> Result<Self, SourceError> {
        let malformed = |e: csv::Error| SourceError::unavailable(origin, e.to_string());

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(malformed)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = rdr
            .records()
            .map(|r| r.map(|rec: StringRecord| rec.iter().map(|s| s.to_string()).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()
            .map_err(malformed)?;

        Ok(Self {
            origin: origin.to_path_buf(),
            headers,
            rows,
        })
    }

    fn column(&self, name: &str) -> Result<usize, SourceError> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            SourceError::unavailable(&self.origin, format!("missing required column '{}'", name))
        })
    }

    fn number(&self, row: &[String], col: usize, row_index: usize) -> Result<f64, SourceError> {
        let raw = &row[col];
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(SourceError::unavailable(
                &self.origin,
                format!(
                    "row {}: column '{}' is not numeric: '{}'",
                    row_index + 1,
                    self.headers[col],
                    raw
                ),
            )),
        }
    }

    fn fields(&self, row: &[String]) -> Vec<Field> {
        self.headers
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect()
    }
}
