// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! One operator session: load once, then rebuild the map on every input.

use crate::annotate::annotate;
use crate::config::MapConfig;
use crate::error::{DashboardError, FilterError};
use crate::filter::{FilterController, FilterCriteria};
use crate::icon::IconProvider;
use crate::proximity::{compute_nearest, MAX_NEAREST_COUNT};
use crate::render::{DescriptorBuilder, MapRenderDescriptor};
use crate::source::DataSource;
use crate::store::GeoStore;
use log::{debug, info, warn};
use std::sync::Arc;

/// Loads both tables, drops out-of-range records and annotates every flight
/// with its nearest airports. `nearest_count` is capped at [`MAX_NEAREST_COUNT`].
pub fn prepare_store(source: &dyn DataSource, nearest_count: usize) -> Result<GeoStore, DashboardError> {
    let nearest_count = nearest_count.min(MAX_NEAREST_COUNT);
    let airports = source.load_airports()?;
    let flights = source.load_flights()?;
    let store = GeoStore::new(airports, flights);

    let nearest = compute_nearest(store.flights(), store.airports(), nearest_count)?;
    let annotated = annotate(store.flights(), &nearest)?;
    info!(
        "Annotated flights with nearest airports — flights={} k={}",
        annotated.len(),
        nearest_count
    );
    Ok(store.with_flights(annotated))
}

/// Identifies one build. Only the most recently issued ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    generation: u64,
}

pub struct Dashboard {
    store: Arc<GeoStore>,
    icons: Box<dyn IconProvider>,
    config: MapConfig,
    controller: FilterController,
    generation: u64,
    criteria: FilterCriteria,
    current: MapRenderDescriptor,
}

impl Dashboard {
    pub fn load(
        source: &dyn DataSource,
        icons: Box<dyn IconProvider>,
        config: MapConfig,
    ) -> Result<Self, DashboardError> {
        let store = prepare_store(source, config.nearest_count)?;
        Self::new(Arc::new(store), icons, config)
    }

    /// Starts a session over an already prepared store, showing everything.
    pub fn new(
        store: Arc<GeoStore>,
        icons: Box<dyn IconProvider>,
        config: MapConfig,
    ) -> Result<Self, DashboardError> {
        let controller = FilterController::new(config.default_center);
        let criteria = FilterCriteria::default();
        let current = {
            let outcome = controller.apply(&criteria, store.flights(), store.airports())?;
            DescriptorBuilder::new(icons.as_ref(), &config).build_outcome(&outcome)
        };
        Ok(Self {
            store,
            icons,
            config,
            controller,
            generation: 0,
            criteria,
            current,
        })
    }

    pub fn store(&self) -> &Arc<GeoStore> {
        &self.store
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The last successfully applied criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The map as of the last successful apply.
    pub fn current(&self) -> &MapRenderDescriptor {
        &self.current
    }

    /// Issues a ticket for a new build, superseding any earlier one.
    pub fn begin(&mut self) -> BuildTicket {
        self.generation += 1;
        BuildTicket {
            generation: self.generation,
        }
    }

    /// Runs the full filter and render pipeline without touching session state.
    pub fn build(&self, criteria: &FilterCriteria) -> Result<MapRenderDescriptor, FilterError> {
        let outcome =
            self.controller
                .apply(criteria, self.store.flights(), self.store.airports())?;
        Ok(DescriptorBuilder::new(self.icons.as_ref(), &self.config).build_outcome(&outcome))
    }

    /// Publishes `descriptor` unless a newer ticket has been issued since.
    pub fn commit(
        &mut self,
        ticket: BuildTicket,
        criteria: FilterCriteria,
        descriptor: MapRenderDescriptor,
    ) -> Result<&MapRenderDescriptor, DashboardError> {
        if ticket.generation != self.generation {
            debug!(
                "Dropping superseded build — ticket={} latest={}",
                ticket.generation, self.generation
            );
            return Err(DashboardError::Superseded);
        }
        self.criteria = criteria;
        self.current = descriptor;
        Ok(&self.current)
    }

    /// Rebuilds the map for `criteria`. Rejected input leaves the previous
    /// map in place and does not supersede builds already in flight.
    pub fn apply(
        &mut self,
        criteria: FilterCriteria,
    ) -> Result<&MapRenderDescriptor, DashboardError> {
        if let Err(e) = criteria.validate() {
            warn!("Rejected filter, keeping previous map — {}", e);
            return Err(e.into());
        }
        let ticket = self.begin();
        let descriptor = match self.build(&criteria) {
            Ok(d) => d,
            Err(e) => {
                warn!("Rejected filter, keeping previous map — {}", e);
                return Err(e.into());
            }
        };
        self.commit(ticket, criteria, descriptor)
    }

    /// Parses raw control text and applies it.
    pub fn apply_inputs(
        &mut self,
        flight: &str,
        airport: &str,
        radius: &str,
    ) -> Result<&MapRenderDescriptor, DashboardError> {
        let criteria = match FilterCriteria::from_inputs(flight, airport, radius) {
            Ok(c) => c,
            Err(e) => {
                warn!("Rejected filter, keeping previous map — {}", e);
                return Err(e.into());
            }
        };
        self.apply(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::RasterIconProvider;
    use crate::render::MarkerKind;
    use crate::store::{Airport, Flight};

    fn store() -> Arc<GeoStore> {
        let airports = vec![
            Airport::new("Kennedy", "KJFK", 40.64, -73.78),
            Airport::new("La Guardia", "KLGA", 40.77, -73.87),
            Airport::new("Newark", "KEWR", 40.69, -74.17),
        ];
        let flights = vec![
            Flight::new("AA100", 40.70, -74.00, 90.0),
            Flight::new("AA123", 40.90, -73.50, 180.0),
            Flight::new("BA200", 41.20, -74.20, 270.0),
        ];
        Arc::new(GeoStore::new(airports, flights))
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            store(),
            Box::new(RasterIconProvider::new()),
            MapConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_map_shows_everything() {
        let d = dashboard();
        assert_eq!(d.current().markers.len(), 6);
        assert_eq!(d.current().center, crate::filter::DEFAULT_CENTER);
        assert!(d.criteria().is_empty());
    }

    #[test]
    fn test_apply_replaces_map() {
        let mut d = dashboard();
        let map = d
            .apply(FilterCriteria::new().flight("AA1").radius_km(20.0))
            .unwrap();
        assert_eq!(map.flight_markers().count(), 2);
        assert_eq!(map.airport_markers().count(), 3);
        assert!(map.overlay.is_some());
        assert_eq!(d.criteria().flight_number.as_deref(), Some("AA1"));
    }

    #[test]
    fn test_invalid_filter_keeps_previous_map() {
        let mut d = dashboard();
        d.apply(FilterCriteria::new().airport("KJ")).unwrap();
        let before = d.current().clone();

        let err = d.apply(FilterCriteria::new().radius_km(-3.0)).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Filter(FilterError::InvalidFilter(_))
        ));
        assert_eq!(d.current(), &before);
        assert_eq!(d.criteria().airport_code.as_deref(), Some("KJ"));

        assert!(d.apply_inputs("AA", "", "abc").is_err());
        assert_eq!(d.current(), &before);
    }

    #[test]
    fn test_superseded_build_is_dropped() {
        let mut d = dashboard();
        let stale = d.begin();
        let stale_map = d.build(&FilterCriteria::new().flight("BA")).unwrap();
        let fresh = d.begin();
        let fresh_map = d.build(&FilterCriteria::new().flight("AA100")).unwrap();

        assert!(matches!(
            d.commit(stale, FilterCriteria::new().flight("BA"), stale_map),
            Err(DashboardError::Superseded)
        ));
        assert_eq!(d.current().markers.len(), 6);

        let map = d
            .commit(fresh, FilterCriteria::new().flight("AA100"), fresh_map)
            .unwrap();
        assert_eq!(map.flight_markers().count(), 1);
    }

    #[test]
    fn test_rejected_input_does_not_supersede_pending_build() {
        let mut d = dashboard();
        let ticket = d.begin();
        let map = d.build(&FilterCriteria::new().flight("AA100")).unwrap();

        assert!(d.apply(FilterCriteria::new().radius_km(0.0)).is_err());
        assert!(d.apply_inputs("", "", "wide").is_err());

        let committed = d
            .commit(ticket, FilterCriteria::new().flight("AA100"), map)
            .unwrap();
        assert_eq!(committed.flight_markers().count(), 1);
    }

    #[test]
    fn test_store_is_shared_read_only() {
        let shared = store();
        let a = Dashboard::new(
            Arc::clone(&shared),
            Box::new(RasterIconProvider::new()),
            MapConfig::default(),
        )
        .unwrap();
        let b = Dashboard::new(
            Arc::clone(&shared),
            Box::new(RasterIconProvider::new()),
            MapConfig::default(),
        )
        .unwrap();
        assert!(Arc::ptr_eq(a.store(), b.store()));
        assert_eq!(a.current(), b.current());
    }

    #[test]
    fn test_flight_markers_carry_rotated_icons() {
        let mut d = dashboard();
        let map = d.apply(FilterCriteria::new().flight("BA200")).unwrap();
        match &map.markers[0].kind {
            MarkerKind::Flight { icon } => {
                assert_eq!(icon.rotation_deg, Some(270.0));
                assert!(icon.asset.is_some());
            }
            other => panic!("expected flight marker, got {:?}", other),
        }
    }
}
