// DomainLens - ui/panels/filters.rs
//
// Filter controls sidebar. Every control reads the current criteria and
// reports a change through an `AppState` setter; nothing here filters.

use crate::app::state::AppState;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if !state.is_loaded() {
        ui.label(egui::RichText::new("No dataset loaded.").weak());
        return;
    }

    // Text search (domain or family)
    ui.label("Search:");
    ui.horizontal(|ui| {
        let mut text = state.criteria().search_text.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text("domain or family\u{2026}")
                .desired_width(ui.available_width() - 22.0),
        );
        if response.changed() {
            state.set_search(text);
        }
        if !state.criteria().search_text.is_empty()
            && ui
                .add(egui::Button::new("\u{2715}").small().frame(false))
                .on_hover_text("Clear search")
                .clicked()
        {
            state.set_search(String::new());
        }
    });

    ui.separator();
    render_brands(ui, state);

    ui.separator();
    render_moats(ui, state);

    ui.separator();
    render_measures(ui, state);

    ui.separator();
    let mut domains_only = state.criteria().domains_only;
    if ui
        .checkbox(&mut domains_only, "Domains only")
        .on_hover_text("Show domain cards without their families")
        .changed()
    {
        state.set_domains_only(domains_only);
    }

    ui.add_space(6.0);
    if ui
        .button("Reset filters")
        .on_hover_text("Clear every filter and restore the default measure")
        .clicked()
    {
        state.reset();
    }
}

/// Brand checkboxes (OR semantics) and the focus-brand selector.
fn render_brands(ui: &mut egui::Ui, state: &mut AppState) {
    let brands: Vec<String> = state
        .schema()
        .selectable_brands()
        .into_iter()
        .map(str::to_string)
        .collect();

    ui.label("Brands:");
    if brands.is_empty() {
        ui.label(egui::RichText::new("No brand columns in this dataset.").weak());
        return;
    }

    let mut toggled: Option<String> = None;
    ui.horizontal_wrapped(|ui| {
        for code in &brands {
            let mut checked = state.criteria().selected_brands.contains(code);
            if ui.checkbox(&mut checked, code.as_str()).changed() {
                toggled = Some(code.clone());
            }
        }
    });
    if let Some(code) = toggled {
        state.toggle_brand(&code);
    }

    let current = state.criteria().focus_brand.clone();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt("focus_brand")
        .selected_text(format!(
            "Focus: {}",
            current.as_deref().unwrap_or("none")
        ))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, None, "none");
            for code in &brands {
                ui.selectable_value(&mut selected, Some(code.clone()), code.as_str());
            }
        });
    if selected != current {
        state.set_focus_brand(selected);
    }
}

/// Moat selector and the use-case selector scoped to it.
fn render_moats(ui: &mut egui::Ui, state: &mut AppState) {
    let moats = state.moat_options();
    ui.label("Moat:");
    if moats.is_empty() {
        ui.label(egui::RichText::new("No moat columns in this dataset.").weak());
        return;
    }

    let current = state.criteria().moat.clone();
    let current_label = current
        .as_deref()
        .and_then(|key| moats.iter().find(|m| m.key == key))
        .map_or("All moats", |m| m.label.as_str())
        .to_string();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt("moat")
        .width(ui.available_width())
        .selected_text(current_label)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, None, "All moats");
            for moat in &moats {
                ui.selectable_value(&mut selected, Some(moat.key.clone()), moat.label.as_str());
            }
        });
    if selected != current {
        state.set_moat(selected);
    }

    let use_cases = state.use_case_options();
    if use_cases.is_empty() {
        return;
    }
    ui.label("Use case:");
    let current = state.criteria().use_case.clone();
    let current_label = current
        .as_deref()
        .and_then(|column| use_cases.iter().find(|u| u.column == column))
        .map_or("All use cases", |u| u.label.as_str())
        .to_string();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt("use_case")
        .width(ui.available_width())
        .selected_text(current_label)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, None, "All use cases");
            for use_case in &use_cases {
                ui.selectable_value(
                    &mut selected,
                    Some(use_case.column.clone()),
                    use_case.label.as_str(),
                );
            }
        });
    if selected != current {
        state.set_use_case(selected);
    }
}

/// Measure buttons; clicking the active measure turns colouring off.
fn render_measures(ui: &mut egui::Ui, state: &mut AppState) {
    let measures = state.measure_options();
    ui.label("Colour by measure:");
    if measures.is_empty() {
        ui.label(egui::RichText::new("No measure columns in this dataset.").weak());
        return;
    }

    let active = state.criteria().active_measure.clone();
    let mut chosen: Option<Option<String>> = None;
    ui.horizontal_wrapped(|ui| {
        for measure in &measures {
            let is_active = active
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(measure));
            if ui.selectable_label(is_active, measure.as_str()).clicked() {
                chosen = Some(if is_active { None } else { Some(measure.clone()) });
            }
        }
    });
    if let Some(measure) = chosen {
        state.set_measure(measure);
    }
}
