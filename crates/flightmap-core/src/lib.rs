// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod annotate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod geo;
pub mod html;
pub mod icon;
pub mod proximity;
pub mod render;
pub mod source;
pub mod store;

pub use config::MapConfig;
pub use dashboard::{prepare_store, BuildTicket, Dashboard};
pub use error::{
    AnnotateError, DashboardError, FilterError, GeoError, IconError, SourceError,
};
pub use filter::{CircleSpec, FilterCriteria, FilterOutcome};
pub use geo::Coordinate;
pub use icon::{IconAsset, IconProvider, RasterIconProvider};
pub use render::{MapRenderDescriptor, MarkerKind, MarkerSpec};
pub use source::{CsvSource, DataSource};
pub use store::{Airport, Flight, GeoStore, NearestAirportEntry};
