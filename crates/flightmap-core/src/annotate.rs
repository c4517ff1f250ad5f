// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::AnnotateError;
use crate::store::{Flight, NearestAirportEntry};

/// Human-readable ranking, e.g. `1.(KLGA, 7.26NM),\n2.(KEWR, 7.76NM)`.
pub fn format_summary(entries: &[NearestAirportEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}.({}, {:.2}NM)", i + 1, e.icao_code, e.distance_nm))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Returns annotated copies of `flights`, in the same order.
pub fn annotate(
    flights: &[Flight],
    nearest: &[Vec<NearestAirportEntry>],
) -> Result<Vec<Flight>, AnnotateError> {
    if flights.len() != nearest.len() {
        return Err(AnnotateError::LengthMismatch {
            flights: flights.len(),
            lists: nearest.len(),
        });
    }

    Ok(flights
        .iter()
        .zip(nearest)
        .map(|(flight, entries)| {
            let mut annotated = flight.clone();
            annotated.nearest_summary = Some(format_summary(entries));
            annotated.nearest_airports = entries.clone();
            annotated
        })
        .collect())
}
