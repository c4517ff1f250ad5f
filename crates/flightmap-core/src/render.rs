// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::{CircleStyle, MapConfig};
use crate::filter::{CircleSpec, FilterOutcome};
use crate::geo::Coordinate;
use crate::icon::{IconAsset, IconProvider, FLIGHT_ICON};
use crate::store::{Airport, Field, Flight};
use log::warn;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub rows: Vec<Field>,
    pub max_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightIcon {
    /// `None` when no icon could be produced; the renderer's default pin is used.
    #[serde(serialize_with = "serialize_asset")]
    pub asset: Option<IconAsset>,
    /// Clockwise rotation baked into `asset`, `None` when it is unrotated.
    pub rotation_deg: Option<f64>,
    pub size: (u32, u32),
}

fn serialize_asset<S: Serializer>(asset: &Option<IconAsset>, s: S) -> Result<S::Ok, S::Error> {
    match asset {
        Some(a) => s.serialize_some(&a.data_uri()),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerKind {
    Airport { style: CircleStyle },
    Flight { icon: FlightIcon },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub kind: MarkerKind,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRenderDescriptor {
    pub center: Coordinate,
    pub zoom: f64,
    pub markers: Vec<MarkerSpec>,
    pub overlay: Option<CircleSpec>,
}

impl MapRenderDescriptor {
    pub fn flight_markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Flight { .. }))
    }

    pub fn airport_markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Airport { .. }))
    }
}

/// Turns filtered records into a full scene. Nothing is cached between
/// builds: every flight marker gets a freshly rotated icon.
pub struct DescriptorBuilder<'a> {
    icons: &'a dyn IconProvider,
    config: &'a MapConfig,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(icons: &'a dyn IconProvider, config: &'a MapConfig) -> Self {
        Self { icons, config }
    }

    pub fn build(
        &self,
        visible_flights: &[&Flight],
        visible_airports: &[&Airport],
        center: Coordinate,
        overlay: Option<CircleSpec>,
    ) -> MapRenderDescriptor {
        let mut markers = Vec::with_capacity(visible_flights.len() + visible_airports.len());

        for flight in visible_flights {
            markers.push(MarkerSpec {
                position: flight.position,
                kind: MarkerKind::Flight {
                    icon: self.flight_icon(flight),
                },
                popup: self.popup(flight.display_fields()),
            });
        }

        for airport in visible_airports {
            markers.push(MarkerSpec {
                position: airport.position,
                kind: MarkerKind::Airport {
                    style: self.config.airport_marker.clone(),
                },
                popup: self.popup(airport.fields.clone()),
            });
        }

        MapRenderDescriptor {
            center,
            zoom: self.config.zoom_start,
            markers,
            overlay,
        }
    }

    pub fn build_outcome(&self, outcome: &FilterOutcome<'_>) -> MapRenderDescriptor {
        self.build(
            &outcome.visible_flights,
            &outcome.visible_airports,
            outcome.center,
            outcome.overlay.clone(),
        )
    }

    fn popup(&self, rows: Vec<Field>) -> Popup {
        Popup {
            rows,
            max_width: self.config.popup_max_width,
        }
    }

    fn flight_icon(&self, flight: &Flight) -> FlightIcon {
        let size = self.config.flight_icon_size;

        let base = match self.icons.get_icon(FLIGHT_ICON) {
            Ok(base) => base,
            Err(e) => {
                warn!(
                    "Flight icon unavailable, using default marker — flight={} error={}",
                    flight.flight_number, e
                );
                return FlightIcon {
                    asset: None,
                    rotation_deg: None,
                    size,
                };
            }
        };

        match self.icons.rotate(&base, flight.direction) {
            Ok(rotated) => FlightIcon {
                asset: Some(rotated),
                rotation_deg: Some(flight.direction),
                size,
            },
            Err(e) => {
                warn!(
                    "Icon rotation failed, using unrotated icon — flight={} direction={} error={}",
                    flight.flight_number, flight.direction, e
                );
                FlightIcon {
                    asset: Some(base),
                    rotation_deg: None,
                    size,
                }
            }
        }
    }
}
