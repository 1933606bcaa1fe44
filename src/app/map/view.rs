use eframe::egui::{self, Color32, CornerRadius, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2};

use super::super::events::MapEvent;
use super::super::physics::{ForceParams, step_simulation};
use super::super::render_utils::{
    BOUNDARY_STROKE, BOUNDARY_STROKE_WIDTH, blend_color, bounds_visible, circle_visible,
    division_color, to_vec2, world_to_screen,
};
use super::super::ViewModel;

const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

impl ViewModel {
    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) -> Rect {
        let size = self.map_size.min(ui.available_size());
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        self.canvas_size = rect.size();
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::ZERO, Color32::WHITE);

        self.handle_map_gestures(ui, rect, &response);

        let now = ui.input(|input| input.time);
        let animating = self.advance_transition(now);

        let mut moving = false;
        if self.live_simulation {
            moving = step_simulation(
                &mut self.simulation,
                ForceParams::with_collision_radius(self.collision_radius),
            );
        }
        if moving || animating || response.dragged() {
            ui.ctx().request_repaint();
        }

        let transform = self.transform;
        let scratch = &mut self.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_positions.extend(
            self.simulation
                .positions()
                .iter()
                .map(|&position| world_to_screen(rect, transform, position)),
        );

        let boundary_stroke = Stroke::new(BOUNDARY_STROKE_WIDTH * transform.k, BOUNDARY_STROKE);
        for ring in &self.boundaries {
            let min = world_to_screen(rect, transform, to_vec2(ring.min));
            let max = world_to_screen(rect, transform, to_vec2(ring.max));
            if !bounds_visible(rect, min, max) {
                continue;
            }
            let points = ring
                .points
                .iter()
                .map(|&point| world_to_screen(rect, transform, to_vec2(point)))
                .collect::<Vec<_>>();
            painter.add(Shape::closed_line(points, boundary_stroke));
        }

        if self.show_quadtree_overlay {
            self.simulation
                .quadtree_cells(&mut self.view_scratch.quadtree_cells);
            for cell in &self.view_scratch.quadtree_cells {
                let half = vec2(cell.half_extent, cell.half_extent);
                let min = world_to_screen(rect, transform, cell.center - half);
                let max = world_to_screen(rect, transform, cell.center + half);
                let alpha = if cell.is_leaf { 110 } else { 55 };
                let width = (1.4_f32 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
                painter.rect_stroke(
                    Rect::from_min_max(min, max),
                    CornerRadius::ZERO,
                    Stroke::new(width, Color32::from_rgba_unmultiplied(30, 120, 200, alpha)),
                    egui::StrokeKind::Middle,
                );
            }
        }

        let pointer = response.hover_pos();
        let screen_radius = self.marker_radius * transform.k;
        let hovered = pointer.and_then(|pointer| self.marker_under(pointer, screen_radius));
        if hovered != self.hovered {
            self.apply(MapEvent::Hover(hovered));
        }
        self.pointer = pointer;
        if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let mut selection_animating = false;
        for (marker, &facility) in self.markers.facility_of.iter().enumerate() {
            if !self.is_visible(facility) {
                continue;
            }
            let Some(&position) = self.view_scratch.screen_positions.get(marker) else {
                continue;
            };
            if !circle_visible(rect, position, screen_radius + 10.0) {
                continue;
            }

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("facility-selection", facility)),
                self.selected == Some(facility) && self.details_open,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            let base = division_color(self.facilities[facility].division());
            painter.circle_filled(position, screen_radius, base);
            if selection_mix > 0.0 {
                draw_selection_halo(&painter, position, screen_radius, selection_mix);
            }
            if self.hovered == Some(facility) {
                painter.circle_stroke(
                    position,
                    screen_radius + 1.0,
                    Stroke::new(1.0, blend_color(base, Color32::WHITE, 0.5)),
                );
            }
        }
        if selection_animating {
            ui.ctx().request_repaint();
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(facility) = self.hovered
        {
            self.apply(MapEvent::Activate(facility));
        }

        rect
    }
}

fn draw_selection_halo(painter: &egui::Painter, position: Pos2, radius: f32, mix: f32) {
    let strength = (mix * (1.0 - mix) * 4.0).clamp(0.0, 1.0);
    let alpha = (60.0 + strength * 145.0) as u8;
    painter.circle_stroke(
        position,
        radius + 3.0 + (1.0 - mix) * 6.0,
        Stroke::new(
            1.2 + strength * 1.6,
            Color32::from_rgba_unmultiplied(
                SELECTED_COLOR.r(),
                SELECTED_COLOR.g(),
                SELECTED_COLOR.b(),
                alpha,
            ),
        ),
    );
}
