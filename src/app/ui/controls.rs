use eframe::egui::{self, RichText, Ui};

use crate::facility::{Division, FilterUpdate};

use super::super::events::MapEvent;
use super::super::render_utils::division_color;
use super::super::ViewModel;

const ALL_OPTION: &str = "All";

/// Combo box over `options` plus an "All" entry. Returns the new choice
/// when the user picked one.
fn option_combo(
    ui: &mut Ui,
    label: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_label(label)
        .selected_text(current.unwrap_or(ALL_OPTION))
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), ALL_OPTION).clicked() {
                picked = Some(None);
            }
            for option in options {
                if ui
                    .selectable_label(current == Some(option.as_str()), option.as_str())
                    .clicked()
                {
                    picked = Some(Some(option.clone()));
                }
            }
        });
    picked
}

fn division_combo(ui: &mut Ui, current: Option<Division>) -> Option<Option<Division>> {
    let mut picked = None;
    egui::ComboBox::from_label("Division")
        .selected_text(current.map_or(ALL_OPTION, Division::label))
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), ALL_OPTION).clicked() {
                picked = Some(None);
            }
            for division in Division::ALL {
                if ui
                    .selectable_label(current == Some(division), division.label())
                    .clicked()
                {
                    picked = Some(Some(division));
                }
            }
        });
    picked
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.separator();
        ui.add_space(4.0);

        let mut updates = Vec::new();

        ui.label("Address");
        if ui
            .text_edit_singleline(&mut self.filter_inputs.address)
            .on_hover_text("Case-insensitive match anywhere in the street address.")
            .changed()
        {
            updates.push(FilterUpdate::Address(self.filter_inputs.address.clone()));
        }

        ui.label("Zip code");
        if ui
            .text_edit_singleline(&mut self.filter_inputs.zip_code)
            .on_hover_text("Exact zip code.")
            .changed()
        {
            updates.push(FilterUpdate::ZipCode(self.filter_inputs.zip_code.clone()));
        }

        ui.add_space(4.0);
        if let Some(choice) = option_combo(
            ui,
            "State",
            self.filter.state.as_deref(),
            &self.filter_options.states,
        ) {
            updates.push(FilterUpdate::State(choice));
        }
        if let Some(choice) = division_combo(ui, self.filter.division) {
            updates.push(FilterUpdate::Division(choice));
        }
        if let Some(choice) = option_combo(
            ui,
            "Time zone",
            self.filter.time_zone.as_deref(),
            &self.filter_options.time_zones,
        ) {
            updates.push(FilterUpdate::TimeZone(choice));
        }
        if let Some(choice) = option_combo(
            ui,
            "EMR",
            self.filter.emr.as_deref(),
            &self.filter_options.emrs,
        ) {
            updates.push(FilterUpdate::Emr(choice));
        }

        for update in updates {
            self.apply(MapEvent::Filter(update));
        }

        ui.add_space(4.0);
        if self.filter.is_empty() {
            ui.label("No filters active.");
        } else {
            ui.label(format!(
                "{} of {} facilities match",
                self.visible_count,
                self.facilities.len()
            ));
        }

        ui.separator();
        ui.label(RichText::new("Legend").strong());
        for division in Division::ALL {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(division_color(division)));
                ui.label(division.label());
            });
        }

        ui.separator();
        self.draw_finder(ui);

        ui.separator();
        ui.checkbox(&mut self.live_simulation, "Live layout simulation")
            .on_hover_text("Keep nudging overlapping markers apart.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay");
    }

    fn draw_finder(&mut self, ui: &mut Ui) {
        ui.label("Find facility")
            .on_hover_text("Fuzzy search over facility names. Pick one to zoom to it.");
        ui.text_edit_singleline(&mut self.finder_query);

        let matches = self.finder_matches();
        if matches.is_empty() {
            if !self.finder_query.trim().is_empty() {
                ui.label("No visible facility matches.");
            }
            return;
        }

        let mut activated = None;
        egui::ScrollArea::vertical()
            .id_salt("finder_results")
            .max_height(220.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for &index in &matches {
                    let Some(facility) = self.facilities.get(index) else {
                        continue;
                    };
                    let label = format!("{} ({})", facility.name, facility.state);
                    if ui
                        .selectable_label(self.selected == Some(index), label)
                        .clicked()
                    {
                        activated = Some(index);
                    }
                }
            });

        if let Some(index) = activated {
            self.apply(MapEvent::Activate(index));
        }
    }
}
