// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Invalid coordinate: lat={lat} lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Data source unavailable ({path}): {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SourceError {
    pub fn unavailable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        SourceError::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IconError {
    #[error("Icon render unavailable: {0}")]
    RenderUnavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    #[error("Nearest-airport list count {lists} does not match flight count {flights}")]
    LengthMismatch { flights: usize, lists: usize },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Annotate(#[from] AnnotateError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Build superseded by a newer filter change")]
    Superseded,
}
