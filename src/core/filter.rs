// DomainLens - core/filter.rs
//
// Composable filter engine for catalog rows.
// Active stages are AND-combined in a fixed order: text search, brand
// selection, moat selection, use-case selection. A stage whose criterion is
// unset is skipped entirely.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::coerce::{is_truthy, to_key, to_text};
use crate::core::model::{Row, Table};
use crate::core::schema::{BrandLayout, ColumnSchema};
use std::collections::BTreeSet;

/// Interactively chosen criteria. Replaced on every user interaction;
/// every field defaults to "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against domain or family. Empty = no filter.
    pub search_text: String,

    /// Brand codes; a row passes when any selected brand applies. Empty = no filter.
    pub selected_brands: BTreeSet<String>,

    /// Moat number key (e.g. `"1"`). None = no filter.
    pub moat: Option<String>,

    /// Exact use-case column name. None = no filter.
    pub use_case: Option<String>,

    /// Presentation hint: show domain cards without their families.
    pub domains_only: bool,

    /// Measure used for tile colouring. None = no colouring.
    pub active_measure: Option<String>,

    /// Brand highlighted in the view. Does not remove rows.
    pub focus_brand: Option<String>,
}

impl FilterCriteria {
    /// Returns true if no row-removing stage is active.
    pub fn is_empty(&self) -> bool {
        self.search().is_none()
            && self.selected_brands.is_empty()
            && self.moat_key().is_none()
            && self.use_case_key().is_none()
    }

    fn search(&self) -> Option<String> {
        let text = self.search_text.trim();
        (!text.is_empty()).then(|| text.to_lowercase())
    }

    fn moat_key(&self) -> Option<&str> {
        self.moat.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    fn use_case_key(&self) -> Option<&str> {
        self.use_case.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Brand stage, resolved against the table's columns.
enum BrandStage {
    /// Flag columns of the selected brands (column layout).
    Flags(Vec<usize>),
    /// Brand code column matched against the selection (row layout).
    Codes {
        brand: Option<usize>,
        exists: Option<usize>,
        codes: BTreeSet<String>,
    },
}

/// Criteria compiled to column positions. `None` stages are skipped.
struct ActiveStages {
    search: Option<String>,
    domain: Option<usize>,
    family: Option<usize>,
    brands: Option<BrandStage>,
    moat: Option<usize>,
    use_case: Option<usize>,
}

impl ActiveStages {
    fn compile(table: &Table, schema: &ColumnSchema, criteria: &FilterCriteria) -> Self {
        let position = |column: Option<&str>| column.and_then(|c| table.column_index(c));

        let brands = (!criteria.selected_brands.is_empty()).then(|| match schema.layout() {
            BrandLayout::BrandColumns => BrandStage::Flags(
                criteria
                    .selected_brands
                    .iter()
                    .filter_map(|code| position(schema.brand_flag_column(code)))
                    .collect(),
            ),
            BrandLayout::BrandRows => BrandStage::Codes {
                brand: position(schema.brand_column.as_deref()),
                exists: position(schema.exists_column.as_deref()),
                codes: criteria
                    .selected_brands
                    .iter()
                    .map(|c| c.trim().to_lowercase())
                    .collect(),
            },
        });

        let moat = criteria.moat_key().and_then(|key| match schema.moat(key) {
            Some(moat) => table.column_index(&moat.column),
            None => {
                tracing::debug!(moat = key, "No column for selected moat; moat stage skipped");
                None
            }
        });

        let use_case = criteria
            .use_case_key()
            .and_then(|column| match schema.use_case(column) {
                Some(use_case) => table.column_index(&use_case.column),
                None => {
                    tracing::debug!(use_case = column, "Unknown use-case column; stage skipped");
                    None
                }
            });

        Self {
            search: criteria.search(),
            domain: position(schema.domain_column.as_deref()),
            family: position(schema.family_column.as_deref()),
            brands,
            moat,
            use_case,
        }
    }

    fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.brands.is_none()
            && self.moat.is_none()
            && self.use_case.is_none()
    }
}

/// Apply criteria to a table, returning indices of matching rows.
///
/// Returns indices into `table.rows()` in their original order, so the
/// caller can address rows without copying them.
pub fn apply_filters(table: &Table, schema: &ColumnSchema, criteria: &FilterCriteria) -> Vec<usize> {
    let stages = ActiveStages::compile(table, schema, criteria);
    if stages.is_empty() {
        return (0..table.len()).collect();
    }

    let matched: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| matches_all(row, &stages))
        .map(|(idx, _)| idx)
        .collect();

    tracing::debug!(
        total = table.len(),
        matched = matched.len(),
        "Filters applied"
    );

    matched
}

/// Check if a single row passes all active stages, in stage order.
fn matches_all(row: &Row, stages: &ActiveStages) -> bool {
    let cell = |column: Option<usize>| column.map(|c| Table::cell(row, c));

    // Text search (domain OR family)
    if let Some(ref needle) = stages.search {
        let hit = [stages.domain, stages.family].into_iter().any(|column| {
            cell(column).is_some_and(|v| to_text(v).to_lowercase().contains(needle.as_str()))
        });
        if !hit {
            return false;
        }
    }

    // Brand selection (OR across selected brands)
    match stages.brands {
        Some(BrandStage::Flags(ref flags)) => {
            if !flags.iter().any(|&c| is_truthy(Table::cell(row, c))) {
                return false;
            }
        }
        Some(BrandStage::Codes {
            brand,
            exists,
            ref codes,
        }) => {
            let code = cell(brand).map(|v| to_key(v).to_lowercase());
            if !code.is_some_and(|c| codes.contains(&c)) {
                return false;
            }
            if exists.is_some() && !cell(exists).is_some_and(is_truthy) {
                return false;
            }
        }
        None => {}
    }

    // Moat selection
    if stages.moat.is_some() && !cell(stages.moat).is_some_and(is_truthy) {
        return false;
    }

    // Use-case selection
    if stages.use_case.is_some() && !cell(stages.use_case).is_some_and(is_truthy) {
        return false;
    }

    true
}
