// DomainLens - tests/e2e_catalog.rs
//
// End-to-end tests for the load -> resolve -> filter -> group -> colour
// pipeline, run against real CSV fixtures on disk.

use domainlens::app::load::{load_dataset, LoadManager, LoadProgress};
use domainlens::app::state::AppState;
use domainlens::core::colour::colour_for;
use domainlens::core::model::Scalar;
use domainlens::core::schema::BrandLayout;
use domainlens::core::table::TableOptions;
use domainlens::platform::config::AppConfig;
use domainlens::util::constants::MAX_DATASET_FILE_SIZE;
use domainlens::util::error::LoadError;
use std::path::PathBuf;
use std::process::Command;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Application state with `name` loaded under the default configuration.
fn loaded_state(name: &str) -> AppState {
    let path = fixture(name);
    let table = load_dataset(&path, &TableOptions::default(), MAX_DATASET_FILE_SIZE)
        .unwrap_or_else(|e| panic!("fixture {name} failed to load: {e}"));
    let mut state = AppState::new(&AppConfig::default(), None, false);
    state.install_dataset(path, table);
    state
}

fn card_names(state: &AppState) -> Vec<String> {
    state.view().cards.iter().map(|c| c.name.clone()).collect()
}

// =============================================================================
// Brand-column dataset
// =============================================================================

#[test]
fn e2e_fixture_loads_and_resolves_schema() {
    let state = loaded_state("catalog_sample.csv");
    assert_eq!(state.table().len(), 7, "blank record should be skipped");

    let schema = state.schema();
    assert_eq!(schema.layout(), BrandLayout::BrandColumns);
    assert_eq!(schema.domain_column.as_deref(), Some("Data Domain"));
    assert_eq!(schema.family_column.as_deref(), Some("Data Family"));
    assert_eq!(schema.selectable_brands(), vec!["AFI", "ADG", "RH"]);
    assert_eq!(schema.moat_columns.len(), 2);
    assert_eq!(schema.use_case_columns.len(), 3);
    assert_eq!(schema.measure_column("quality"), Some("Quality"));
    assert_eq!(schema.measure_column("Timeliness"), None);
}

#[test]
fn e2e_default_view_excludes_other_and_sorts_domains() {
    let state = loaded_state("catalog_sample.csv");
    assert_eq!(state.status_message, "7 rows / 4 data domains shown");
    assert_eq!(
        card_names(&state),
        vec!["Customer, Success", "Finance", "Supply Chain", "Warehouse"]
    );

    let supply = &state.view().cards[2];
    assert_eq!(supply.slug, "supply-chain");
    let families: Vec<&str> = supply.families.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(families, vec!["Demand Plan", "Inventory"]);
}

#[test]
fn e2e_duplicate_family_keeps_first_row_colour() {
    let state = loaded_state("catalog_sample.csv");
    let tile = state.view().tile("Supply Chain", "Demand Plan").unwrap();
    assert_eq!(tile.row, 0);
    let reading = tile.reading.as_ref().unwrap();
    assert_eq!(reading.value, "85");
    assert_eq!(reading.colour, colour_for(&Scalar::Number(85.0)));
}

#[test]
fn e2e_measure_colours_clamp_and_skip_non_numeric() {
    let state = loaded_state("catalog_sample.csv");
    let view = state.view();

    let support = view.tile("Customer, Success", "Support Tickets").unwrap();
    let colour = support.reading.as_ref().and_then(|r| r.colour).unwrap();
    assert!((colour.hue - 120.0).abs() < 1e-9);

    let slotting = view.tile("Warehouse", "Slotting").unwrap();
    let reading = slotting.reading.as_ref().unwrap();
    assert_eq!(reading.value, "n/a");
    assert!(reading.colour.is_none());
}

#[test]
fn e2e_moat_and_use_case_selection() {
    let mut state = loaded_state("catalog_sample.csv");

    state.set_moat(Some("1".to_string()));
    assert_eq!(state.status_message, "3 rows / 1 data domains shown");
    assert_eq!(card_names(&state), vec!["Supply Chain"]);

    let options: Vec<String> = state
        .use_case_options()
        .into_iter()
        .map(|o| o.label)
        .collect();
    assert_eq!(options, vec!["1.1 Demand Forecasting", "1.2 Replenishment"]);

    state.set_use_case(Some("1.1 Demand Forecasting".to_string()));
    assert_eq!(state.status_message, "2 rows / 1 data domains shown");

    state.set_moat(Some("2".to_string()));
    assert!(state.criteria().use_case.is_none());
    assert_eq!(
        card_names(&state),
        vec!["Supply Chain", "Warehouse"]
    );
}

#[test]
fn e2e_brand_selection_is_or_and_search_narrows() {
    let mut state = loaded_state("catalog_sample.csv");

    state.toggle_brand("AFI");
    assert_eq!(state.view().row_count(), 4);
    assert_eq!(card_names(&state), vec!["Customer, Success", "Supply Chain"]);

    state.toggle_brand("AFI");
    state.toggle_brand("ADG");
    state.toggle_brand("RH");
    assert_eq!(state.view().row_count(), 6);
    assert_eq!(card_names(&state), vec!["Finance", "Supply Chain", "Warehouse"]);

    state.set_search("LEDGER");
    assert_eq!(state.status_message, "1 rows / 1 data domains shown");

    state.set_search("no such family");
    assert!(state.view().is_empty());
    assert_eq!(state.status_message, "0 rows / 0 data domains shown");

    state.reset();
    assert_eq!(state.status_message, "7 rows / 4 data domains shown");
}

#[test]
fn e2e_export_filtered_rows_to_csv() {
    let mut state = loaded_state("catalog_sample.csv");
    state.set_moat(Some("1".to_string()));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("export.csv");
    let file = std::fs::File::create(&dest).unwrap();
    let count = domainlens::core::export::export_csv(
        state.table(),
        &state.view().filtered_rows,
        file,
        &dest,
    )
    .unwrap();
    assert_eq!(count, 3);

    let written = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(written.lines().count(), 4);
    assert!(written.starts_with("Data Domain,Data Family,AFI"));
    assert!(written.contains("Other,Misc"));
}

#[test]
fn e2e_export_view_to_json() {
    let state = loaded_state("catalog_sample.csv");
    let mut buf = Vec::new();
    let count = domainlens::core::export::export_json(
        state.view(),
        &mut buf,
        std::path::Path::new("view.json"),
    )
    .unwrap();
    assert_eq!(count, 4);

    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed["cards"][0]["slug"], "customer-success");
    assert_eq!(parsed["active_measure"]["name"], "Quality");
}

// =============================================================================
// Brand-row dataset
// =============================================================================

#[test]
fn e2e_brand_rows_layout() {
    let mut state = loaded_state("catalog_brand_rows.csv");
    assert_eq!(state.schema().layout(), BrandLayout::BrandRows);
    assert_eq!(state.status_message, "5 rows / 2 data domains shown");

    let ledger = state.view().tile("Finance", "Ledger").unwrap();
    assert_eq!(ledger.brands, vec!["AFI"]);
    let fleet = state.view().tile("Ops", "Fleet").unwrap();
    assert!(fleet.reading.is_none());

    state.toggle_brand("RH");
    assert_eq!(state.view().row_count(), 1);
    assert!(state.view().tile("Finance", "Payables").is_some());
    state.toggle_brand("RH");

    state.set_focus_brand(Some("AFI".to_string()));
    let view = state.view();
    assert_eq!(view.tile("Finance", "Ledger").unwrap().focus, Some(true));
    assert_eq!(view.tile("Finance", "Payables").unwrap().focus, Some(false));
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn e2e_background_load_of_fixture() {
    let mut manager = LoadManager::new();
    manager.start_load(
        fixture("catalog_sample.csv"),
        TableOptions::default(),
        MAX_DATASET_FILE_SIZE,
    );
    match manager.wait() {
        Some(LoadProgress::Loaded { table, .. }) => assert_eq!(table.len(), 7),
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
fn e2e_row_cap_fails_the_load() {
    let options = TableOptions {
        max_rows: 3,
        ..Default::default()
    };
    let result = load_dataset(&fixture("catalog_sample.csv"), &options, MAX_DATASET_FILE_SIZE);
    assert!(matches!(result, Err(LoadError::TooManyRows { max: 3, .. })));
}

#[test]
fn e2e_semicolon_dataset_with_configured_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("semi.csv");
    std::fs::write(&path, "Domain;Family;AFI\nFinance;Ledger;x\n").unwrap();

    let options = TableOptions {
        delimiter: b';',
        ..Default::default()
    };
    let table = load_dataset(&path, &options, MAX_DATASET_FILE_SIZE).unwrap();
    let mut state = AppState::new(&AppConfig::default(), None, false);
    state.install_dataset(path, table);
    state.toggle_brand("AFI");
    assert_eq!(state.status_message, "1 rows / 1 data domains shown");
}

// =============================================================================
// Headless CLI
// =============================================================================

#[test]
fn e2e_summary_mode_prints_status_line() {
    let config_dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_domainlens"))
        .arg("--summary")
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg(fixture("catalog_sample.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("7 rows / 4 data domains shown"), "{stdout}");
    assert!(stdout.contains("Supply Chain: 2 families"));
}

#[test]
fn e2e_summary_mode_fails_on_missing_dataset() {
    let config_dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_domainlens"))
        .arg("--summary")
        .arg("--config-dir")
        .arg(config_dir.path())
        .arg(config_dir.path().join("absent.csv"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Load error: Cannot read dataset"), "{stderr}");
}
