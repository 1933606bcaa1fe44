use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::events::MapEvent;
use super::super::render_utils::screen_to_local;
use super::super::viewport::DOUBLE_CLICK_ZOOM_SECS;
use super::super::ViewModel;

const WHEEL_ZOOM_RATE: f32 = 0.002;

impl ViewModel {
    pub(in crate::app) fn handle_map_gestures(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.apply(MapEvent::Gesture(self.transform.translate_by(delta)));
            }
        }

        if !response.hovered() {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchor = screen_to_local(rect, pointer);

        let (pinch, scroll) = ui.input(|input| (input.zoom_delta(), input.raw_scroll_delta.y));
        let factor = if (pinch - 1.0).abs() > f32::EPSILON {
            pinch
        } else if scroll.abs() > f32::EPSILON {
            2.0_f32.powf(scroll * WHEEL_ZOOM_RATE)
        } else {
            1.0
        };

        if (factor - 1.0).abs() > f32::EPSILON {
            let next = self.transform.scale_about(self.transform.k * factor, anchor);
            if next != self.transform {
                self.apply(MapEvent::Gesture(next));
            }
        }

        if response.double_clicked() && self.hovered.is_none() {
            let shift = ui.input(|input| input.modifiers.shift);
            let k = if shift {
                self.transform.k / 2.0
            } else {
                self.transform.k * 2.0
            };
            let target = self.transform.scale_about(k, anchor);
            self.apply(MapEvent::AnimateTo(target, DOUBLE_CLICK_ZOOM_SECS));
        }
    }

    pub(in crate::app) fn marker_under(&self, pointer: Pos2, screen_radius: f32) -> Option<usize> {
        self.markers
            .facility_of
            .iter()
            .zip(&self.view_scratch.screen_positions)
            .filter(|&(&facility, _)| self.is_visible(facility))
            .filter_map(|(&facility, position)| {
                let distance = position.distance(pointer);
                (distance <= screen_radius).then_some((facility, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(facility, _)| facility)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{
        Context, Event, Modifiers, MouseWheelUnit, PointerButton, Pos2, RawInput, Vec2, vec2,
    };

    use super::super::build::fixtures::model;
    use super::super::super::viewport::ZoomTransform;
    use crate::facility::FilterUpdate;

    use super::*;

    struct MapHarness {
        ctx: Context,
        time: f64,
        model: ViewModel,
        canvas: Rect,
    }

    impl MapHarness {
        fn new() -> Self {
            let mut model = model();
            // Markers stay on their seed spiral next to the canvas origin.
            model.live_simulation = false;
            let mut harness = Self {
                ctx: Context::default(),
                time: 0.0,
                model,
                canvas: Rect::NOTHING,
            };
            harness.frame(Vec::new());
            harness
        }

        fn frame_with(&mut self, modifiers: Modifiers, events: Vec<Event>) {
            self.time += 1.0 / 60.0;
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(1200.0, 800.0))),
                time: Some(self.time),
                modifiers,
                events,
                ..RawInput::default()
            };
            let model = &mut self.model;
            let canvas = &mut self.canvas;
            let _ = self.ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| *canvas = model.draw_map(ui));
            });
        }

        fn frame(&mut self, events: Vec<Event>) {
            self.frame_with(Modifiers::NONE, events);
        }

        fn wait(&mut self, secs: f64) {
            self.time += secs;
            self.frame(Vec::new());
        }

        fn point(&self, local: Vec2) -> Pos2 {
            self.canvas.min + local
        }

        fn hover(&mut self, pointer: Pos2) {
            self.frame(vec![Event::PointerMoved(pointer)]);
            self.frame(Vec::new());
        }

        fn button(&mut self, pointer: Pos2, pressed: bool, modifiers: Modifiers) {
            self.frame_with(
                modifiers,
                vec![Event::PointerButton {
                    pos: pointer,
                    button: PointerButton::Primary,
                    pressed,
                    modifiers,
                }],
            );
        }

        fn click(&mut self, pointer: Pos2, modifiers: Modifiers) {
            self.button(pointer, true, modifiers);
            self.button(pointer, false, modifiers);
        }

        fn wheel(&mut self, dy: f32) {
            self.frame(vec![Event::MouseWheel {
                unit: MouseWheelUnit::Point,
                delta: vec2(0.0, dy),
                modifiers: Modifiers::NONE,
            }]);
        }

        fn world_at(&self, pointer: Pos2) -> Vec2 {
            self.model.transform.invert(pointer - self.canvas.min)
        }

        fn screen_of(&self, world: Vec2) -> Pos2 {
            self.canvas.min + self.model.transform.apply(world)
        }
    }

    #[test]
    fn canvas_takes_configured_map_size() {
        let harness = MapHarness::new();
        assert_eq!(harness.canvas.size(), vec2(960.0, 600.0));
        assert_eq!(harness.model.canvas_size, vec2(960.0, 600.0));
    }

    #[test]
    fn wheel_up_zooms_in_about_the_pointer() {
        let mut harness = MapHarness::new();
        let pointer = harness.point(vec2(480.0, 300.0));
        harness.hover(pointer);
        let world = harness.world_at(pointer);

        harness.wheel(100.0);
        let k = harness.model.transform.k;
        assert!((k - 2.0_f32.powf(0.2)).abs() < 1e-4, "k = {k}");
        assert!(harness.screen_of(world).distance(pointer) < 1e-2);
        assert!((harness.model.marker_radius - 3.0 / k).abs() < 1e-6);

        harness.wheel(-100.0);
        assert!((harness.model.transform.k - 1.0).abs() < 1e-4);
        harness.wheel(-100.0);
        assert_eq!(harness.model.transform.k, 1.0);
        assert!(harness.screen_of(world).distance(pointer) < 1e-2);
    }

    #[test]
    fn pinch_zooms_about_the_pointer() {
        let mut harness = MapHarness::new();
        let pointer = harness.point(vec2(300.0, 200.0));
        harness.hover(pointer);
        let world = harness.world_at(pointer);

        harness.frame(vec![Event::Zoom(1.5)]);
        assert!((harness.model.transform.k - 1.5).abs() < 1e-5);
        assert!(harness.screen_of(world).distance(pointer) < 1e-2);
    }

    #[test]
    fn drag_pans_and_cancels_running_animation() {
        let mut harness = MapHarness::new();
        harness.model.apply(MapEvent::Activate(0));
        assert!(harness.model.transition.is_some());

        let start = harness.point(vec2(480.0, 300.0));
        harness.hover(start);
        harness.button(start, true, Modifiers::NONE);
        let before = harness.model.transform;

        for step in 1..=3 {
            harness.frame(vec![Event::PointerMoved(start + vec2(10.0 * step as f32, 0.0))]);
        }
        harness.button(start + vec2(30.0, 0.0), false, Modifiers::NONE);

        assert!(harness.model.transition.is_none());
        let after = harness.model.transform;
        assert_eq!(after.k, before.k);
        assert!((after.x - (before.x + 30.0)).abs() < 1e-3, "x = {}", after.x);
        assert!((after.y - before.y).abs() < 1e-3);
        assert_eq!(harness.model.selected, Some(0));
    }

    #[test]
    fn double_click_zooms_in_twice_over_a_quarter_second() {
        let mut harness = MapHarness::new();
        let pointer = harness.point(vec2(400.0, 250.0));
        harness.hover(pointer);
        let world = harness.world_at(pointer);

        harness.click(pointer, Modifiers::NONE);
        harness.click(pointer, Modifiers::NONE);
        let target = harness.model.transition.as_ref().map(|transition| transition.target());
        assert_eq!(target.map(|transform| transform.k), Some(2.0));

        harness.wait(0.125);
        let k = harness.model.transform.k;
        assert!(k > 1.0 && k < 2.0, "k = {k}");

        harness.wait(0.2);
        assert!(harness.model.transition.is_none());
        assert_eq!(harness.model.transform.k, 2.0);
        assert!(harness.screen_of(world).distance(pointer) < 1e-2);
        assert!(!harness.model.details_open);
    }

    #[test]
    fn shift_double_click_zooms_out() {
        let mut harness = MapHarness::new();
        let pointer = harness.point(vec2(400.0, 250.0));
        let zoomed = ZoomTransform::IDENTITY.scale_about(4.0, vec2(480.0, 300.0));
        harness.model.apply(MapEvent::Gesture(zoomed));
        harness.hover(pointer);
        let world = harness.world_at(pointer);

        harness.click(pointer, Modifiers::SHIFT);
        harness.click(pointer, Modifiers::SHIFT);
        harness.wait(1.0);

        assert_eq!(harness.model.transform.k, 2.0);
        assert!(harness.screen_of(world).distance(pointer) < 1e-2);
    }

    #[test]
    fn double_click_on_marker_acts_as_marker_click() {
        let mut harness = MapHarness::new();
        let pointer = harness.canvas.min + harness.model.simulation.positions()[3];
        harness.hover(pointer);
        assert_eq!(harness.model.hovered, Some(3));

        harness.click(pointer, Modifiers::NONE);
        harness.click(pointer, Modifiers::NONE);
        assert_eq!(harness.model.selected, Some(3));
        assert!(harness.model.details_open);
        let target = harness.model.transition.as_ref().map(|transition| transition.target());
        assert_eq!(target.map(|transform| transform.k), Some(ViewModel::CLICK_ZOOM_SCALE));

        harness.wait(1.0);
        assert_eq!(harness.model.transform.k, ViewModel::CLICK_ZOOM_SCALE);
    }

    #[test]
    fn paused_layout_holds_markers_until_resumed() {
        let mut harness = MapHarness::new();
        let seeded = harness.model.simulation.positions().to_vec();

        harness.hover(harness.point(vec2(480.0, 300.0)));
        harness.wheel(100.0);
        assert_eq!(harness.model.simulation.positions(), seeded.as_slice());

        harness.model.live_simulation = true;
        harness.frame(Vec::new());
        assert_ne!(harness.model.simulation.positions(), seeded.as_slice());
    }

    #[test]
    fn picks_nearest_visible_marker() {
        let mut model = model();
        model.view_scratch.screen_positions = vec![
            Pos2::new(10.0, 10.0),
            Pos2::new(12.0, 10.0),
            Pos2::new(100.0, 100.0),
            Pos2::new(200.0, 200.0),
            Pos2::new(300.0, 300.0),
        ];

        assert_eq!(model.marker_under(Pos2::new(11.8, 10.0), 3.0), Some(1));
        assert_eq!(model.marker_under(Pos2::new(50.0, 50.0), 3.0), None);
        // Marker 4 draws facility 5.
        assert_eq!(model.marker_under(Pos2::new(301.0, 300.0), 3.0), Some(5));

        model.apply(MapEvent::Filter(FilterUpdate::State(Some("IL".to_owned()))));
        assert_eq!(model.marker_under(Pos2::new(11.8, 10.0), 3.0), Some(0));
    }
}
