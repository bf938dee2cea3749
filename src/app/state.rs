// DomainLens - app/state.rs
//
// Application state: the single controller that owns the loaded rows, the
// resolved schema, the current criteria and the last computed view.
// Owned by the eframe::App implementation.
//
// Every setter replaces the criteria and recomputes the view in full.

use crate::core::filter::FilterCriteria;
use crate::core::model::Table;
use crate::core::schema::{ColumnSchema, SchemaVocabulary};
use crate::core::view::{compute_view, tile_detail, CatalogView, FamilyTile, TileDetail};
use crate::platform::config::AppConfig;
use crate::util::constants;
use crate::util::error::LoadError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A moat choice for the moat selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoatOption {
    /// Moat number, used as the criteria key.
    pub key: String,
    pub label: String,
}

/// A use-case choice for the use-case selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseOption {
    /// Exact column name, used as the criteria key.
    pub column: String,
    pub label: String,
}

/// The family tile opened in the detail drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTile {
    pub domain: String,
    pub family: String,
}

/// Where the dataset is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    NotLoaded,
    Loading,
    Loaded,
    /// Load failed; the message is shown in place of the cards.
    Failed(String),
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Vocabulary the schema is resolved against.
    pub vocabulary: SchemaVocabulary,

    /// Moat display labels keyed by moat number.
    pub moat_labels: BTreeMap<String, String>,

    /// Measure selected initially and after a reset.
    pub default_measure: Option<String>,

    /// Dataset currently shown (or being loaded).
    pub dataset_path: Option<PathBuf>,

    pub dataset_status: DatasetStatus,

    /// Family tile shown in the detail drawer.
    pub selected: Option<SelectedTile>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (configuration problems).
    pub warnings: Vec<String>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    table: Table,
    schema: ColumnSchema,
    criteria: FilterCriteria,
    view: CatalogView,
}

impl AppState {
    /// Create initial state from the validated configuration.
    ///
    /// `measure_override` (from the command line) replaces the default measure.
    pub fn new(config: &AppConfig, measure_override: Option<String>, debug_mode: bool) -> Self {
        let vocabulary = SchemaVocabulary {
            brand_codes: config.brand_codes.clone(),
            measures: config.measures.clone(),
        };
        let default_measure = measure_override
            .or_else(|| default_measure_for(&vocabulary))
            .filter(|m| !m.trim().is_empty());

        Self {
            vocabulary,
            moat_labels: config.moat_labels.clone(),
            criteria: FilterCriteria {
                active_measure: default_measure.clone(),
                ..Default::default()
            },
            default_measure,
            dataset_path: None,
            dataset_status: DatasetStatus::NotLoaded,
            selected: None,
            status_message: "Ready. Open a dataset to begin.".to_string(),
            warnings: Vec::new(),
            debug_mode,
            table: Table::default(),
            schema: ColumnSchema::default(),
            view: CatalogView::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Dataset lifecycle
    // -------------------------------------------------------------------------

    /// Mark a load as started for `path`.
    pub fn begin_load(&mut self, path: &Path) {
        self.dataset_path = Some(path.to_path_buf());
        self.dataset_status = DatasetStatus::Loading;
        self.status_message = format!("Loading {}...", path.display());
    }

    /// Install a freshly loaded table: resolve its schema, reset the criteria
    /// and compute the first view.
    pub fn install_dataset(&mut self, path: PathBuf, table: Table) {
        self.schema = ColumnSchema::resolve(table.columns(), &self.vocabulary);
        self.table = table;
        self.dataset_path = Some(path);
        self.dataset_status = DatasetStatus::Loaded;
        self.criteria = self.default_criteria();
        self.selected = None;
        self.recompute();
    }

    /// Record a failed load. The previous table is discarded.
    pub fn fail_load(&mut self, path: PathBuf, error: &LoadError) {
        self.table = Table::default();
        self.schema = ColumnSchema::default();
        self.view = CatalogView::default();
        self.selected = None;
        self.dataset_path = Some(path);
        self.dataset_status = DatasetStatus::Failed(error.to_string());
        self.status_message = format!("Load failed: {error}");
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset_status == DatasetStatus::Loaded
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    // -------------------------------------------------------------------------
    // Criteria setters
    // -------------------------------------------------------------------------

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.recompute();
    }

    /// Add the brand to the selection, or remove it if already selected.
    pub fn toggle_brand(&mut self, code: &str) {
        if !self.criteria.selected_brands.remove(code) {
            self.criteria.selected_brands.insert(code.to_string());
        }
        self.recompute();
    }

    /// Select a moat. Any use-case selection is cleared, since use cases
    /// are scoped to a moat.
    pub fn set_moat(&mut self, moat: Option<String>) {
        self.criteria.moat = moat;
        self.criteria.use_case = None;
        self.recompute();
    }

    pub fn set_use_case(&mut self, column: Option<String>) {
        self.criteria.use_case = column;
        self.recompute();
    }

    pub fn set_domains_only(&mut self, domains_only: bool) {
        self.criteria.domains_only = domains_only;
        self.recompute();
    }

    pub fn set_measure(&mut self, measure: Option<String>) {
        self.criteria.active_measure = measure;
        self.recompute();
    }

    pub fn set_focus_brand(&mut self, brand: Option<String>) {
        self.criteria.focus_brand = brand;
        self.recompute();
    }

    /// Restore every criterion to its default, keeping the default measure.
    pub fn reset(&mut self) {
        self.criteria = self.default_criteria();
        self.recompute();
        tracing::debug!("Criteria reset");
    }

    fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            active_measure: self.default_measure.clone(),
            ..Default::default()
        }
    }

    /// Recompute the view from the current table, schema and criteria.
    fn recompute(&mut self) {
        self.view = compute_view(&self.table, &self.schema, &self.criteria);

        // Drop a selection whose tile is no longer shown.
        if let Some(ref sel) = self.selected {
            if self.view.tile(&sel.domain, &sel.family).is_none() {
                self.selected = None;
            }
        }

        self.status_message = self.view.status_line();
    }

    // -------------------------------------------------------------------------
    // Selector options
    // -------------------------------------------------------------------------

    /// Moat choices in numeric order.
    pub fn moat_options(&self) -> Vec<MoatOption> {
        self.schema
            .moat_columns
            .iter()
            .map(|m| MoatOption {
                key: m.number.clone(),
                label: self.moat_label(&m.number, &m.column),
            })
            .collect()
    }

    /// Display label for a moat: `Moat N: <label>` when a label is
    /// configured, else the column name.
    pub fn moat_label(&self, number: &str, column: &str) -> String {
        match self.moat_labels.get(number) {
            Some(label) => format!("Moat {number}: {label}"),
            None => column.trim().to_string(),
        }
    }

    /// Use cases under the selected moat, in column order. Empty when no
    /// moat is selected.
    pub fn use_case_options(&self) -> Vec<UseCaseOption> {
        let Some(moat) = self.criteria.moat.as_deref() else {
            return Vec::new();
        };
        self.schema
            .use_cases_for_moat(moat)
            .map(|u| UseCaseOption {
                column: u.column.clone(),
                label: format!("{} {}", u.code, u.label),
            })
            .collect()
    }

    /// Measures the dataset carries, in vocabulary order.
    pub fn measure_options(&self) -> Vec<String> {
        self.schema
            .available_measures()
            .map(|m| m.name.clone())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn select_tile(&mut self, domain: &str, family: &str) {
        self.selected = Some(SelectedTile {
            domain: domain.to_string(),
            family: family.to_string(),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_tile(&self) -> Option<&FamilyTile> {
        let sel = self.selected.as_ref()?;
        self.view.tile(&sel.domain, &sel.family)
    }

    /// Detail for the selected tile, with moat numbers rendered as labels.
    pub fn selected_detail(&self) -> Option<TileDetail> {
        let sel = self.selected.as_ref()?;
        let tile = self.view.tile(&sel.domain, &sel.family)?;
        let mut detail = tile_detail(&self.table, &self.schema, &sel.domain, tile);
        detail.moats = detail
            .moats
            .iter()
            .map(|number| {
                let column = self
                    .schema
                    .moat(number)
                    .map(|m| m.column.as_str())
                    .unwrap_or(number.as_str());
                self.moat_label(number, column)
            })
            .collect();
        Some(detail)
    }
}

/// The built-in default measure when the vocabulary carries it, else the
/// vocabulary's first measure.
fn default_measure_for(vocabulary: &SchemaVocabulary) -> Option<String> {
    vocabulary
        .measures
        .iter()
        .find(|m| m.eq_ignore_ascii_case(constants::DEFAULT_ACTIVE_MEASURE))
        .or_else(|| vocabulary.measures.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Scalar;

    fn state_with(table: Table) -> AppState {
        let mut state = AppState::new(&AppConfig::default(), None, false);
        state.install_dataset(PathBuf::from("test.csv"), table);
        state
    }

    fn catalog() -> Table {
        Table::from_records(
            ["Domain", "Family", "AFI", "RH", "Quality", "MOAT 1", "MOAT 4", "1.1 Forecasting", "1.2 Replenishment"],
            vec![
                vec![
                    Scalar::from("Supply Chain"),
                    Scalar::from("Demand Plan"),
                    Scalar::Bool(true),
                    Scalar::Bool(false),
                    Scalar::Number(80.0),
                    Scalar::from("x"),
                    Scalar::Empty,
                    Scalar::from("yes"),
                    Scalar::Empty,
                ],
                vec![
                    Scalar::from("Finance"),
                    Scalar::from("Ledger"),
                    Scalar::Bool(false),
                    Scalar::Bool(true),
                    Scalar::Number(30.0),
                    Scalar::Empty,
                    Scalar::from("x"),
                    Scalar::Empty,
                    Scalar::from("yes"),
                ],
            ],
        )
    }

    #[test]
    fn test_initial_view_uses_default_measure() {
        let state = state_with(catalog());
        assert!(state.is_loaded());
        assert_eq!(state.criteria().active_measure.as_deref(), Some("Quality"));
        assert_eq!(state.status_message, "2 rows / 2 data domains shown");
        assert!(state
            .view()
            .tile("Finance", "Ledger")
            .and_then(|t| t.reading.as_ref())
            .is_some());
    }

    #[test]
    fn test_measure_override_wins() {
        let state = AppState::new(&AppConfig::default(), Some("Timeliness".to_string()), false);
        assert_eq!(state.default_measure.as_deref(), Some("Timeliness"));
    }

    #[test]
    fn test_set_moat_clears_use_case() {
        let mut state = state_with(catalog());
        state.set_moat(Some("1".to_string()));
        state.set_use_case(Some("1.1 Forecasting".to_string()));
        assert_eq!(state.view().row_count(), 1);

        state.set_moat(Some("4".to_string()));
        assert!(state.criteria().use_case.is_none());
        assert_eq!(state.status_message, "1 rows / 1 data domains shown");
    }

    #[test]
    fn test_toggle_brand_adds_and_removes() {
        let mut state = state_with(catalog());
        state.toggle_brand("RH");
        assert_eq!(state.view().row_count(), 1);
        state.toggle_brand("RH");
        assert!(state.criteria().selected_brands.is_empty());
        assert_eq!(state.view().row_count(), 2);
    }

    #[test]
    fn test_reset_restores_defaults_and_measure() {
        let mut state = state_with(catalog());
        state.set_search("ledger");
        state.set_measure(None);
        state.set_domains_only(true);
        state.set_focus_brand(Some("AFI".to_string()));
        state.reset();
        assert_eq!(
            state.criteria(),
            &FilterCriteria {
                active_measure: Some("Quality".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(state.view().row_count(), 2);
    }

    #[test]
    fn test_moat_options_use_configured_labels() {
        let state = state_with(catalog());
        let options = state.moat_options();
        assert_eq!(
            options,
            vec![
                MoatOption {
                    key: "1".to_string(),
                    label: "Moat 1: Supply Chain & Demand Planning".to_string(),
                },
                MoatOption {
                    key: "4".to_string(),
                    label: "MOAT 4".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_use_case_options_follow_selected_moat() {
        let mut state = state_with(catalog());
        assert!(state.use_case_options().is_empty());
        state.set_moat(Some("1".to_string()));
        let labels: Vec<String> = state.use_case_options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["1.1 Forecasting", "1.2 Replenishment"]);
        state.set_moat(Some("4".to_string()));
        assert!(state.use_case_options().is_empty());
    }

    #[test]
    fn test_selection_dropped_when_tile_filtered_out() {
        let mut state = state_with(catalog());
        state.select_tile("Finance", "Ledger");
        let detail = state.selected_detail().unwrap();
        assert_eq!(detail.moats, vec!["MOAT 4"]);
        assert_eq!(detail.use_cases, vec!["1.2 Replenishment"]);

        state.set_search("supply");
        assert!(state.selected.is_none());
        assert!(state.selected_tile().is_none());
    }

    #[test]
    fn test_failed_load_clears_view() {
        let mut state = state_with(catalog());
        let error = LoadError::MissingHeader {
            path: PathBuf::from("bad.csv"),
        };
        state.fail_load(PathBuf::from("bad.csv"), &error);
        assert!(matches!(state.dataset_status, DatasetStatus::Failed(_)));
        assert!(state.view().is_empty());
        assert!(state.status_message.starts_with("Load failed"));
    }
}
