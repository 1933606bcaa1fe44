use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Facility Map");
                    ui.separator();
                    ui.label(format!("facilities: {}", self.facilities.len()));
                    ui.label(format!("markers: {}", self.marker_count()));
                    ui.label(format!("boundary rings: {}", self.boundaries.len()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.draw_controls(ui));
            });

        let canvas = egui::CentralPanel::default()
            .show(ctx, |ui| self.draw_map(ui))
            .inner;

        self.draw_tooltip(ctx);
        self.draw_details(ctx, canvas);
    }
}
