use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};
use tracing::{error, info};

use crate::facility::{Facility, FilterState, load_facilities};
use crate::geo::{GeoRing, ProjectedRing, load_boundaries};

mod events;
mod map;
mod physics;
mod render_utils;
mod ui;
mod viewport;

use physics::LayoutSimulation;
use viewport::{ZoomTransform, ZoomTransition};

#[derive(Clone, Debug)]
pub struct MapConfig {
    pub boundaries_path: PathBuf,
    pub facilities_path: PathBuf,
    /// Size of the map area; the projection is centred on it once at load.
    pub map_size: Vec2,
    pub projection_scale: f64,
}

pub struct FacilityMapApp {
    config: MapConfig,
    state: AppState,
}

enum AppState {
    Loading(PendingLoad),
    Ready(Box<ViewModel>),
    Error(String),
}

enum LoadMessage {
    Boundaries(Result<Vec<GeoRing>, String>),
    Facilities(Result<Vec<Facility>, String>),
}

struct PendingLoad {
    rx: Receiver<LoadMessage>,
    boundaries: Option<Vec<GeoRing>>,
    facilities: Option<Vec<Facility>>,
}

enum LoadProgress {
    Waiting,
    Done(Vec<GeoRing>, Vec<Facility>),
    Failed(String),
}

struct ViewModel {
    facilities: Vec<Facility>,
    boundaries: Vec<ProjectedRing>,
    markers: MarkerLayer,
    simulation: LayoutSimulation,
    live_simulation: bool,
    collision_radius: f32,
    marker_radius: f32,
    filter: FilterState,
    filter_inputs: FilterInputs,
    filter_options: FilterOptions,
    visible: Vec<bool>,
    visible_count: usize,
    transform: ZoomTransform,
    transition: Option<ZoomTransition>,
    map_size: Vec2,
    canvas_size: Vec2,
    hovered: Option<usize>,
    pointer: Option<Pos2>,
    selected: Option<usize>,
    details_open: bool,
    finder_query: String,
    finder_cache: Option<FinderCache>,
    show_quadtree_overlay: bool,
    view_scratch: ViewScratch,
}

/// Facilities with a projected position get a marker; marker `i` is also
/// simulation node `i`.
struct MarkerLayer {
    facility_of: Vec<usize>,
    marker_of: Vec<Option<usize>>,
}

#[derive(Default)]
struct FilterInputs {
    address: String,
    zip_code: String,
}

struct FilterOptions {
    states: Vec<String>,
    time_zones: Vec<String>,
    emrs: Vec<String>,
}

struct FinderCache {
    query: String,
    matches: Vec<usize>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    quadtree_cells: Vec<physics::QuadtreeCell>,
}

impl FacilityMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: MapConfig) -> Self {
        let state = Self::start_load(&config);
        Self { config, state }
    }

    fn spawn_load(config: &MapConfig) -> Receiver<LoadMessage> {
        let (tx, rx) = mpsc::channel();

        let boundaries_path = config.boundaries_path.clone();
        let boundaries_tx: Sender<LoadMessage> = tx.clone();
        thread::spawn(move || {
            let result = load_boundaries(&boundaries_path).map_err(|error| format!("{error:#}"));
            let _ = boundaries_tx.send(LoadMessage::Boundaries(result));
        });

        let facilities_path = config.facilities_path.clone();
        thread::spawn(move || {
            let result = load_facilities(&facilities_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(LoadMessage::Facilities(result));
        });

        rx
    }

    fn start_load(config: &MapConfig) -> AppState {
        info!(
            boundaries = %config.boundaries_path.display(),
            facilities = %config.facilities_path.display(),
            "loading map data"
        );
        AppState::Loading(PendingLoad {
            rx: Self::spawn_load(config),
            boundaries: None,
            facilities: None,
        })
    }
}

impl PendingLoad {
    /// Drains finished loads. Facility setup waits for both resources.
    fn poll(&mut self) -> LoadProgress {
        loop {
            match self.rx.try_recv() {
                Ok(LoadMessage::Boundaries(Ok(rings))) => self.boundaries = Some(rings),
                Ok(LoadMessage::Facilities(Ok(facilities))) => self.facilities = Some(facilities),
                Ok(LoadMessage::Boundaries(Err(error)) | LoadMessage::Facilities(Err(error))) => {
                    return LoadProgress::Failed(error);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.boundaries.is_none() || self.facilities.is_none() {
                        return LoadProgress::Failed(
                            "Background load worker disconnected".to_owned(),
                        );
                    }
                    break;
                }
            }
        }

        if self.boundaries.is_some() && self.facilities.is_some() {
            let boundaries = self.boundaries.take().unwrap_or_default();
            let facilities = self.facilities.take().unwrap_or_default();
            LoadProgress::Done(boundaries, facilities)
        } else {
            LoadProgress::Waiting
        }
    }
}

impl eframe::App for FacilityMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading(pending) => {
                match pending.poll() {
                    LoadProgress::Done(boundaries, facilities) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            boundaries,
                            facilities,
                            &self.config,
                        ))));
                    }
                    LoadProgress::Failed(message) => {
                        error!(%message, "failed to load map data");
                        transition = Some(AppState::Error(message));
                    }
                    LoadProgress::Waiting => ctx.request_repaint(),
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading facility map...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load map data");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> (Sender<LoadMessage>, PendingLoad) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            PendingLoad {
                rx,
                boundaries: None,
                facilities: None,
            },
        )
    }

    #[test]
    fn waits_for_both_resources() {
        let (tx, mut pending) = pending();
        tx.send(LoadMessage::Facilities(Ok(vec![Facility::default()])))
            .expect("send");
        assert!(matches!(pending.poll(), LoadProgress::Waiting));

        tx.send(LoadMessage::Boundaries(Ok(vec![vec![[0.0, 0.0]; 3]])))
            .expect("send");
        match pending.poll() {
            LoadProgress::Done(boundaries, facilities) => {
                assert_eq!(boundaries.len(), 1);
                assert_eq!(facilities.len(), 1);
            }
            _ => panic!("expected both loads to be done"),
        }
    }

    #[test]
    fn either_failure_surfaces() {
        let (tx, mut pending) = pending();
        tx.send(LoadMessage::Boundaries(Err("bad geojson".to_owned())))
            .expect("send");
        match pending.poll() {
            LoadProgress::Failed(message) => assert_eq!(message, "bad geojson"),
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn dropped_workers_are_reported() {
        let (tx, mut pending) = pending();
        drop(tx);
        assert!(matches!(pending.poll(), LoadProgress::Failed(_)));
    }
}
