// DomainLens - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels and manages the dataset load lifecycle.

use crate::app::load::{LoadManager, LoadProgress};
use crate::app::state::{AppState, DatasetStatus};
use crate::core::table::TableOptions;
use crate::ui;
use crate::util::{constants, error};
use std::path::{Path, PathBuf};

/// The DomainLens application.
pub struct CatalogApp {
    pub state: AppState,
    pub load_manager: LoadManager,
    table_options: TableOptions,
    show_about: bool,
}

impl CatalogApp {
    /// Create a new application instance and start loading `initial_dataset`.
    pub fn new(state: AppState, table_options: TableOptions, initial_dataset: Option<PathBuf>) -> Self {
        let mut app = Self {
            state,
            load_manager: LoadManager::new(),
            table_options,
            show_about: false,
        };
        if let Some(path) = initial_dataset {
            app.start_load(path);
        }
        app
    }

    fn start_load(&mut self, path: PathBuf) {
        self.state.begin_load(&path);
        self.load_manager.start_load(
            path,
            self.table_options.clone(),
            constants::MAX_DATASET_FILE_SIZE,
        );
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        let messages = self.load_manager.poll_progress();
        let had_messages = !messages.is_empty();
        for msg in messages {
            match msg {
                LoadProgress::Started { path } => {
                    self.state.status_message = format!("Reading {}...", path.display());
                }
                LoadProgress::Loaded {
                    path,
                    table,
                    duration,
                } => {
                    tracing::debug!(
                        rows = table.len(),
                        elapsed_ms = duration.as_millis() as u64,
                        "Installing dataset"
                    );
                    self.state.install_dataset(path, table);
                }
                LoadProgress::Failed { path, error } => {
                    self.state.fail_load(path, &error);
                }
            }
        }
        // Repaint while loading so the result appears promptly.
        if had_messages || self.state.dataset_status == DatasetStatus::Loading {
            ctx.request_repaint();
        }
    }

    fn export_csv(&mut self) {
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("catalog_export.csv")
            .save_file()
        else {
            return;
        };
        let result = create_export(&dest).and_then(|f| {
            Ok(crate::core::export::export_csv(
                self.state.table(),
                &self.state.view().filtered_rows,
                f,
                &dest,
            )?)
        });
        self.state.status_message = match result {
            Ok(n) => format!("Exported {n} rows to CSV."),
            Err(e) => format!("CSV export failed: {e}"),
        };
    }

    fn export_json(&mut self) {
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("catalog_view.json")
            .save_file()
        else {
            return;
        };
        let result = create_export(&dest)
            .and_then(|f| Ok(crate::core::export::export_json(self.state.view(), f, &dest)?));
        self.state.status_message = match result {
            Ok(n) => format!("Exported {n} data domains to JSON."),
            Err(e) => format!("JSON export failed: {e}"),
        };
    }
}

fn create_export(dest: &Path) -> error::Result<std::fs::File> {
    std::fs::File::create(dest).map_err(|e| {
        error::ExportError::Io {
            path: dest.to_path_buf(),
            source: e,
        }
        .into()
    })
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Delimited text", &["csv", "tsv", "txt"])
                            .pick_file()
                        {
                            self.start_load(path);
                        }
                        ui.close_menu();
                    }
                    let loaded = self.state.dataset_path.is_some();
                    ui.add_enabled_ui(loaded, |ui| {
                        if ui.button("Reload").clicked() {
                            if let Some(path) = self.state.dataset_path.clone() {
                                self.start_load(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    // Export sub-menu -- enabled only when something is shown
                    let has_rows = self.state.is_loaded() && !self.state.view().is_empty();
                    ui.add_enabled_ui(has_rows, |ui| {
                        ui.menu_button("Export", |ui| {
                            if ui.button("Filtered rows (CSV)\u{2026}").clicked() {
                                self.export_csv();
                                ui.close_menu();
                            }
                            if ui.button("Domain cards (JSON)\u{2026}").clicked() {
                                self.export_json();
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                if !self.state.warnings.is_empty() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "\u{26a0} {} config warning(s)",
                            self.state.warnings.len()
                        ))
                        .color(ui::theme::WARNING_TEXT),
                    )
                    .on_hover_text(self.state.warnings.join("\n"));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(ref path) = self.state.dataset_path {
                        ui.label(egui::RichText::new(path.display().to_string()).weak());
                    }
                });
            });
        });

        // Left sidebar: filter controls
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Right drawer: shown only while a family is selected
        if self.state.selected.is_some() {
            egui::SidePanel::right("detail_pane")
                .default_width(ui::theme::DETAIL_PANE_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    ui::panels::detail::render(ui, &mut self.state);
                });
        }

        // Central panel: domain cards
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::cards::render(ui, &mut self.state);
        });

        ui::panels::about::render(ctx, &mut self.show_about);
    }
}
