// DomainLens - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Headless summary mode (--summary)
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use domainlens::app;
pub use domainlens::core;
pub use domainlens::platform;
pub use domainlens::ui;
pub use domainlens::util;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// DomainLens - data catalog viewer.
///
/// Loads a CSV describing data domains and families and shows them as cards,
/// filterable by brand, moat and use case and coloured by a quality measure.
#[derive(Parser, Debug)]
#[command(name = "DomainLens", version, about)]
struct Cli {
    /// Dataset to open (defaults to [dataset] path from config.toml).
    path: Option<PathBuf>,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Measure used for colouring at startup and after a reset.
    #[arg(short = 'm', long = "measure")]
    measure: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Load the dataset, print a summary to stdout and exit without a window.
    #[arg(short = 's', long = "summary")]
    summary: bool,
}

/// Apply the configured theme and body font size.
fn apply_appearance(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            if matches!(text_style, egui::TextStyle::Body | egui::TextStyle::Button) {
                font.size = font_size;
            }
        }
    });
}

/// Headless mode: load synchronously, print the status line and the family
/// count of every domain shown.
fn run_summary(
    state: &mut app::state::AppState,
    path: PathBuf,
    options: &core::table::TableOptions,
) -> util::error::Result<()> {
    let table = app::load::load_dataset(&path, options, util::constants::MAX_DATASET_FILE_SIZE)?;
    state.install_dataset(path, table);
    let view = state.view();
    println!("{}", view.status_line());
    for card in &view.cards {
        println!("  {}: {} families", card.name, card.families.len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging so its level can take part in the filter.
    let platform_paths = match cli.config_dir {
        Some(ref dir) => platform::config::PlatformPaths::with_config_dir(dir.clone()),
        None => platform::config::PlatformPaths::resolve(),
    };
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %platform_paths.config_file().display(),
        "DomainLens starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let mut state = app::state::AppState::new(&config, cli.measure.clone(), cli.debug);
    state.warnings = config_warnings;

    let table_options = core::table::TableOptions {
        delimiter: config.delimiter,
        max_rows: config.max_rows,
    };

    if cli.summary {
        let path = cli.path.unwrap_or_else(|| config.dataset_path.clone());
        return match run_summary(&mut state, path, &table_options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Summary failed");
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    // An explicit path is always loaded; the configured default only if present.
    let initial_dataset = cli
        .path
        .or_else(|| Some(config.dataset_path.clone()).filter(|p| p.is_file()));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            apply_appearance(&cc.egui_ctx, dark_mode, font_size);
            Ok(Box::new(gui::CatalogApp::new(
                state,
                table_options,
                initial_dataset,
            )))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch DomainLens GUI: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
