use eframe::egui::{Vec2, vec2};
use tracing::{info, warn};

use crate::facility::{Facility, FilterState, visibility_mask};
use crate::geo::{AlbersUsa, GeoRing, project_rings};
use crate::util::distinct_in_order;

use super::super::physics::LayoutSimulation;
use super::super::viewport::ZoomTransform;
use super::super::{
    FilterInputs, FilterOptions, MapConfig, MarkerLayer, ViewModel, ViewScratch,
};

impl FilterOptions {
    pub(in crate::app) fn from_facilities(facilities: &[Facility]) -> Self {
        Self {
            states: distinct_in_order(facilities.iter().map(|facility| facility.state.as_str())),
            time_zones: distinct_in_order(
                facilities.iter().map(|facility| facility.timezone.as_str()),
            ),
            emrs: distinct_in_order(facilities.iter().map(|facility| facility.emr_name.as_str())),
        }
    }
}

impl ViewModel {
    pub(in crate::app) const BASE_MARKER_RADIUS: f32 = 3.0;
    /// Collision radius until the first transform change.
    pub(in crate::app) const INITIAL_COLLISION_RADIUS: f32 = 5.0;
    pub(in crate::app) const CLICK_ZOOM_SCALE: f32 = 10.0;

    pub(in crate::app) fn new(
        boundaries: Vec<GeoRing>,
        facilities: Vec<Facility>,
        config: &MapConfig,
    ) -> Self {
        let map_size = config.map_size;
        let projection = AlbersUsa::new(
            config.projection_scale,
            [f64::from(map_size.x) / 2.0, f64::from(map_size.y) / 2.0],
        );

        let boundaries = project_rings(&boundaries, &projection);

        let mut facility_of = Vec::with_capacity(facilities.len());
        let mut marker_of = Vec::with_capacity(facilities.len());
        let mut targets = Vec::with_capacity(facilities.len());
        for (index, facility) in facilities.iter().enumerate() {
            match projection.project(facility.longitude, facility.latitude) {
                Some([x, y]) => {
                    marker_of.push(Some(facility_of.len()));
                    facility_of.push(index);
                    targets.push(vec2(x as f32, y as f32));
                }
                None => marker_of.push(None),
            }
        }

        let unplaced = facilities.len() - facility_of.len();
        if unplaced > 0 {
            warn!(unplaced, "facilities outside the map projection have no marker");
        }
        info!(
            facilities = facilities.len(),
            markers = facility_of.len(),
            rings = boundaries.len(),
            "map ready"
        );

        let filter = FilterState::default();
        let visible = visibility_mask(&facilities, &filter);
        let filter_options = FilterOptions::from_facilities(&facilities);

        let mut model = Self {
            boundaries,
            markers: MarkerLayer {
                facility_of,
                marker_of,
            },
            simulation: LayoutSimulation::new(targets),
            live_simulation: true,
            collision_radius: Self::INITIAL_COLLISION_RADIUS,
            marker_radius: Self::BASE_MARKER_RADIUS,
            filter,
            filter_inputs: FilterInputs::default(),
            filter_options,
            visible_count: 0,
            visible,
            transform: ZoomTransform::IDENTITY,
            transition: None,
            map_size,
            canvas_size: map_size,
            hovered: None,
            pointer: None,
            selected: None,
            details_open: false,
            finder_query: String::new(),
            finder_cache: None,
            show_quadtree_overlay: false,
            view_scratch: ViewScratch::default(),
            facilities,
        };
        model.visible_count = model.visible.iter().filter(|&&visible| visible).count();
        model
    }

    pub(in crate::app) fn marker_count(&self) -> usize {
        self.markers.facility_of.len()
    }

    pub(in crate::app) fn marker_target(&self, facility: usize) -> Option<Vec2> {
        let marker = self.markers.marker_of.get(facility).copied().flatten()?;
        self.simulation.target(marker)
    }
}

#[cfg(test)]
pub(in crate::app) mod fixtures {
    use std::path::PathBuf;

    use eframe::egui::vec2;

    use crate::facility::Facility;

    use super::super::super::{MapConfig, ViewModel};

    pub(in crate::app) fn facility(
        name: &str,
        division_name: &str,
        state: &str,
        timezone: &str,
        emr_name: &str,
        longitude: f64,
        latitude: f64,
    ) -> Facility {
        Facility {
            name: name.to_owned(),
            address1: format!("{name} Way"),
            city: "Springfield".to_owned(),
            state: state.to_owned(),
            zipcode: "62701".to_owned(),
            division_name: division_name.to_owned(),
            timezone: timezone.to_owned(),
            emr_name: emr_name.to_owned(),
            coid: "000".to_owned(),
            longitude,
            latitude,
        }
    }

    pub(in crate::app) fn springfield_general() -> Facility {
        Facility {
            name: "Springfield General".to_owned(),
            address1: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zipcode: "62701".to_owned(),
            division_name: "HSC".to_owned(),
            timezone: "Central".to_owned(),
            emr_name: "Epic".to_owned(),
            coid: "123".to_owned(),
            longitude: -89.65,
            latitude: 39.78,
        }
    }

    pub(in crate::app) fn config() -> MapConfig {
        MapConfig {
            boundaries_path: PathBuf::from("boundaries.json"),
            facilities_path: PathBuf::from("facilities.csv"),
            map_size: vec2(960.0, 600.0),
            projection_scale: 1300.0,
        }
    }

    pub(in crate::app) fn roster() -> Vec<Facility> {
        vec![
            springfield_general(),
            facility("Gulf Hub Sites", "Gulf Coast", "TX", "Central", "Meditech", -95.36, 29.76),
            facility("Denver Supply", "Supply Chain", "CO", "Mountain", "Cerner", -104.99, 39.74),
            facility("Tampa General", "West Florida", "FL", "Eastern", "Epic", -82.46, 27.95),
            facility("Nowhere", "Continental", "tx", "central", "Epic", f64::NAN, f64::NAN),
            facility("Miami Clinic", "East Florida", "FL", "Eastern", "Meditech", -80.19, 25.76),
        ]
    }

    pub(in crate::app) fn model() -> ViewModel {
        let ring = vec![[-100.0, 40.0], [-99.0, 40.0], [-99.0, 41.0], [-100.0, 40.0]];
        ViewModel::new(vec![ring], roster(), &config())
    }
}
