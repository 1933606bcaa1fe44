use eframe::egui::{self, Align2, Color32, Context, Id, Order, Rect, RichText, Stroke, vec2};

use crate::facility::Facility;

use super::super::events::MapEvent;
use super::super::ViewModel;

const TOOLTIP_OFFSET: egui::Vec2 = vec2(10.0, -10.0);
const DETAILS_INSET: egui::Vec2 = vec2(-10.0, 10.0);

pub(in crate::app) fn tooltip_lines(facility: &Facility) -> [(&'static str, &str); 3] {
    [
        ("Name", facility.name.as_str()),
        ("Division", facility.division_name.as_str()),
        ("State", facility.state.as_str()),
    ]
}

pub(in crate::app) fn detail_lines(facility: &Facility) -> Vec<(&'static str, String)> {
    vec![
        ("Name", facility.name.clone()),
        ("COID", facility.coid.clone()),
        ("Address", facility.full_address()),
        ("Division", facility.division_name.clone()),
        ("Time Zone", facility.timezone.clone()),
        ("EMR", facility.emr_name.clone()),
    ]
}

impl ViewModel {
    pub(in crate::app) fn draw_tooltip(&self, ctx: &Context) {
        let (Some(index), Some(pointer)) = (self.hovered, self.pointer) else {
            return;
        };
        let Some(facility) = self.facilities.get(index) else {
            return;
        };

        egui::Area::new(Id::new("facility_tooltip"))
            .order(Order::Tooltip)
            .fixed_pos(pointer + TOOLTIP_OFFSET)
            .pivot(Align2::LEFT_BOTTOM)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for (label, value) in tooltip_lines(facility) {
                        ui.label(format!("{label}: {value}"));
                    }
                });
            });
    }

    /// Detail panel pinned to the top-right corner of the map canvas.
    pub(in crate::app) fn draw_details(&mut self, ctx: &Context, canvas: Rect) {
        if !self.details_open {
            return;
        }
        let Some(facility) = self.selected.and_then(|index| self.facilities.get(index)) else {
            return;
        };

        let mut close = false;
        egui::Area::new(Id::new("facility_details"))
            .order(Order::Foreground)
            .fixed_pos(canvas.right_top() + DETAILS_INSET)
            .pivot(Align2::RIGHT_TOP)
            .show(ctx, |ui| {
                ui.visuals_mut().override_text_color = Some(Color32::from_gray(30));
                egui::Frame::new()
                    .fill(Color32::WHITE)
                    .stroke(Stroke::new(1.0, Color32::from_gray(0xcc)))
                    .corner_radius(5)
                    .inner_margin(egui::Margin::same(10))
                    .shadow(ui.style().visuals.popup_shadow)
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Facility details").strong());
                            if ui.small_button("x").on_hover_text("Close").clicked() {
                                close = true;
                            }
                        });
                        ui.separator();
                        egui::Grid::new("facility_details_grid")
                            .num_columns(2)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for (label, value) in detail_lines(facility) {
                                    ui.label(RichText::new(label).strong());
                                    ui.label(value);
                                    ui.end_row();
                                }
                            });
                    });
            });

        if close {
            self.apply(MapEvent::CloseDetails);
        }
    }
}
