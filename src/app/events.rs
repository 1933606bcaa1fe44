use tracing::{debug, trace};

use crate::facility::{FilterUpdate, visibility_mask};

use super::ViewModel;
use super::viewport::{CLICK_ZOOM_SECS, ZoomTransform, ZoomTransition};

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum MapEvent {
    Filter(FilterUpdate),
    /// Pointer entered a marker (`Some`) or left every marker (`None`).
    Hover(Option<usize>),
    Activate(usize),
    CloseDetails,
    /// User gesture; interrupts any running zoom animation.
    Gesture(ZoomTransform),
    AnimateTo(ZoomTransform, f64),
    TransitionFrame(ZoomTransform),
}

impl ViewModel {
    pub(in crate::app) fn apply(&mut self, event: MapEvent) {
        match event {
            MapEvent::Filter(update) => {
                trace!(?update, "filter changed");
                self.filter.apply(update);
                self.recompute_visibility();
            }
            MapEvent::Hover(hovered) => {
                self.hovered = hovered.filter(|&index| self.is_visible(index));
            }
            MapEvent::Activate(index) => self.activate(index),
            MapEvent::CloseDetails => self.details_open = false,
            MapEvent::Gesture(transform) => {
                self.transition = None;
                self.set_transform(transform);
            }
            MapEvent::AnimateTo(target, duration_secs) => {
                self.transition = Some(ZoomTransition::new(
                    self.transform,
                    target,
                    self.canvas_size,
                    duration_secs,
                ));
            }
            MapEvent::TransitionFrame(transform) => self.set_transform(transform),
        }
    }

    fn recompute_visibility(&mut self) {
        self.visible = visibility_mask(&self.facilities, &self.filter);
        self.visible_count = self.visible.iter().filter(|&&visible| visible).count();
        if self.hovered.is_some_and(|index| !self.is_visible(index)) {
            self.hovered = None;
        }
    }

    pub(in crate::app) fn is_visible(&self, facility: usize) -> bool {
        self.visible.get(facility).copied().unwrap_or(false)
    }

    fn activate(&mut self, index: usize) {
        if index >= self.facilities.len() {
            return;
        }

        self.selected = Some(index);
        self.details_open = true;

        // Zoom to where the facility belongs, not where the layout put it.
        let Some(target) = self.marker_target(index) else {
            return;
        };
        let destination =
            ZoomTransform::centered_on(target, Self::CLICK_ZOOM_SCALE, self.canvas_size);
        debug!(facility = index, ?destination, "zooming to facility");
        self.apply(MapEvent::AnimateTo(destination, CLICK_ZOOM_SECS));
    }

    fn set_transform(&mut self, transform: ZoomTransform) {
        let k = ZoomTransform::clamp_scale(transform.k);
        self.transform = ZoomTransform { k, ..transform };
        self.marker_radius = Self::BASE_MARKER_RADIUS / k;
        self.collision_radius = self.marker_radius;
        self.simulation.restart();
    }

    pub(in crate::app) fn advance_transition(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };

        let (transform, finished) = transition.sample(now);
        if finished {
            self.transition = None;
        }
        self.apply(MapEvent::TransitionFrame(transform));
        true
    }
}
