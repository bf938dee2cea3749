// DomainLens - ui/panels/cards.rs
//
// Central panel: one card per data domain, each holding its family tiles.
// Tiles are filled with the active measure's colour; a tile the focus brand
// applies to gets an outline, others are dimmed.

use crate::app::state::{AppState, DatasetStatus};
use crate::core::view::{DomainCard, FamilyTile};
use crate::ui::theme;

/// Render the domain card grid, or the state message when there is nothing
/// to show.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    match &state.dataset_status {
        DatasetStatus::NotLoaded => {
            centred_message(ui, "Open a dataset (File \u{2192} Open CSV\u{2026}) to begin.", None);
            return;
        }
        DatasetStatus::Loading => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }
        DatasetStatus::Failed(message) => {
            let text = format!("Dataset could not be loaded.\n\n{message}");
            centred_message(ui, &text, Some(theme::ERROR_TEXT));
            return;
        }
        DatasetStatus::Loaded => {}
    }

    if state.view().is_empty() {
        centred_message(ui, "No data domains match the current filters.", None);
        return;
    }

    let dark_mode = ui.visuals().dark_mode;
    let domains_only = state.view().domains_only;
    let mut clicked: Option<(String, String)> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(theme::CARD_SPACING, theme::CARD_SPACING);
            ui.horizontal_wrapped(|ui| {
                for card in &state.view().cards {
                    if let Some(hit) = render_card(ui, card, domains_only, dark_mode) {
                        clicked = Some((card.name.clone(), hit));
                    }
                }
            });
        });

    if let Some((domain, family)) = clicked {
        state.select_tile(&domain, &family);
    }
}

/// One domain card. Returns the family whose tile was clicked.
fn render_card(
    ui: &mut egui::Ui,
    card: &DomainCard,
    domains_only: bool,
    dark_mode: bool,
) -> Option<String> {
    let mut clicked = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(theme::CARD_WIDTH);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&card.name).strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{}", card.families.len()))
                            .small()
                            .weak(),
                    )
                    .on_hover_text("Families shown");
                });
            });
            if domains_only {
                return;
            }
            ui.add_space(4.0);
            ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
            for tile in &card.families {
                if render_tile(ui, tile, dark_mode) {
                    clicked = Some(tile.name.clone());
                }
            }
        });
    });
    clicked
}

/// One family tile. Returns true when clicked.
fn render_tile(ui: &mut egui::Ui, tile: &FamilyTile, dark_mode: bool) -> bool {
    let colour = tile.reading.as_ref().and_then(|r| r.colour.as_ref());
    let fill = colour.map_or_else(|| theme::neutral_fill(dark_mode), theme::measure_fill);

    let mut text = egui::RichText::new(&tile.name);
    if colour.is_some() {
        text = text.color(theme::MEASURE_TEXT);
    }
    if tile.focus == Some(false) {
        text = text.color(theme::UNFOCUSED_TEXT);
    }

    let mut button = egui::Button::new(text)
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), theme::TILE_HEIGHT));
    if tile.focus == Some(true) {
        button = button.stroke(egui::Stroke::new(2.0, theme::FOCUS_STROKE));
    }

    ui.add(button)
        .on_hover_text(tile_tooltip(tile))
        .clicked()
}

fn tile_tooltip(tile: &FamilyTile) -> String {
    let mut lines = vec![tile.name.clone()];
    if !tile.brands.is_empty() {
        lines.push(format!("Brands: {}", tile.brands.join(", ")));
    }
    match &tile.reading {
        Some(reading) => lines.push(format!("{}: {}", reading.measure, reading.value)),
        None => lines.push("No measure value".to_string()),
    }
    lines.join("\n")
}

fn centred_message(ui: &mut egui::Ui, text: &str, colour: Option<egui::Color32>) {
    ui.centered_and_justified(|ui| {
        let mut rich = egui::RichText::new(text).size(15.0);
        if let Some(c) = colour {
            rich = rich.color(c);
        }
        ui.label(rich);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::MeasureReading;

    #[test]
    fn test_tooltip_lists_brands_and_reading() {
        let tile = FamilyTile {
            name: "Demand Plan".to_string(),
            row: 0,
            brands: vec!["AFI".to_string(), "RH".to_string()],
            reading: Some(MeasureReading {
                measure: "Quality".to_string(),
                value: "80".to_string(),
                colour: None,
            }),
            focus: None,
        };
        assert_eq!(
            tile_tooltip(&tile),
            "Demand Plan\nBrands: AFI, RH\nQuality: 80"
        );
    }
}
