// DomainLens - ui/panels/detail.rs
//
// Detail drawer for the selected family tile: brand flags, every measure
// with its colour, and the moats and use cases flagged for its row.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the detail drawer (right panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(detail) = state.selected_detail() else {
        ui.centered_and_justified(|ui| {
            ui.label("Select a family to view details.");
        });
        return;
    };

    ui.horizontal(|ui| {
        ui.heading(&detail.family);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(egui::Button::new("\u{2715}").small().frame(false))
                .on_hover_text("Close")
                .clicked()
            {
                state.clear_selection();
            }
        });
    });
    ui.label(egui::RichText::new(&detail.domain).weak());
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("detail_brands")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for (code, applies) in &detail.brands {
                    ui.label(format!("{code}:"));
                    ui.label(if *applies { "\u{2713}" } else { "\u{2014}" });
                    ui.end_row();
                }
            });

        ui.separator();
        ui.label(egui::RichText::new("Measures").strong());
        if detail.readings.is_empty() {
            ui.label(egui::RichText::new("No measure values.").weak());
        }
        egui::Grid::new("detail_measures")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for reading in &detail.readings {
                    ui.label(format!("{}:", reading.measure));
                    let mut value = egui::RichText::new(format!(" {} ", reading.value));
                    if let Some(colour) = &reading.colour {
                        value = value
                            .background_color(theme::measure_fill(colour))
                            .color(theme::MEASURE_TEXT);
                    }
                    ui.label(value);
                    ui.end_row();
                }
            });

        ui.separator();
        ui.label(egui::RichText::new("Moats").strong());
        if detail.moats.is_empty() {
            ui.label(egui::RichText::new("None flagged.").weak());
        }
        for moat in &detail.moats {
            ui.label(moat);
        }

        if !detail.use_cases.is_empty() {
            ui.separator();
            ui.label(egui::RichText::new("Use cases").strong());
            for use_case in &detail.use_cases {
                ui.label(use_case);
            }
        }
    });
}
