// DomainLens - core/view.rs
//
// The recompute operation: filter -> group -> colour, producing plain data
// the presentation layer renders as domain cards and family tiles.
// Recomputed in full on every criteria change; nothing is cached between
// calls.

use crate::core::coerce::{is_truthy, slugify, to_text};
use crate::core::colour::{colour_for, Hsl};
use crate::core::filter::{apply_filters, FilterCriteria};
use crate::core::group::{group_rows, FamilyMembers, GroupedView};
use crate::core::model::Table;
use crate::core::schema::{BrandLayout, ColumnSchema};
use serde::Serialize;

/// The measure used for colouring, resolved to its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveMeasure {
    pub name: String,
    pub column: String,
}

/// A measure value on a tile plus its colour directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureReading {
    pub measure: String,
    /// Raw value as text, for tooltips.
    pub value: String,
    /// `None` renders unstyled.
    pub colour: Option<Hsl>,
}

/// One family inside a domain card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyTile {
    pub name: String,
    /// Row the tile's colour and details are drawn from.
    pub row: usize,
    /// Brand codes that apply to the family.
    pub brands: Vec<String>,
    pub reading: Option<MeasureReading>,
    /// Whether the focus brand applies; `None` when no focus brand is set.
    pub focus: Option<bool>,
}

/// One domain card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCard {
    pub name: String,
    pub slug: String,
    pub families: Vec<FamilyTile>,
}

/// Everything presentation needs for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogView {
    /// Indices of rows that passed filtering, in table order.
    #[serde(skip)]
    pub filtered_rows: Vec<usize>,
    #[serde(skip)]
    pub grouped: GroupedView,
    pub cards: Vec<DomainCard>,
    pub domains_only: bool,
    pub active_measure: Option<ActiveMeasure>,
}

impl CatalogView {
    /// Rows surviving filtering (before domain/family exclusion).
    pub fn row_count(&self) -> usize {
        self.filtered_rows.len()
    }

    pub fn domain_count(&self) -> usize {
        self.grouped.domain_count()
    }

    /// True when no domain card would be shown. A normal state, not an error.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Status summary, e.g. `"12 rows / 3 data domains shown"`.
    pub fn status_line(&self) -> String {
        format!(
            "{} rows / {} data domains shown",
            self.row_count(),
            self.domain_count()
        )
    }

    pub fn tile(&self, domain: &str, family: &str) -> Option<&FamilyTile> {
        self.cards
            .iter()
            .find(|c| c.name == domain)?
            .families
            .iter()
            .find(|f| f.name == family)
    }
}

/// Recompute the full view for the given criteria.
pub fn compute_view(table: &Table, schema: &ColumnSchema, criteria: &FilterCriteria) -> CatalogView {
    let filtered_rows = apply_filters(table, schema, criteria);
    let grouped = group_rows(table, schema, &filtered_rows);

    let active_measure = criteria.active_measure.as_deref().and_then(|name| {
        schema.measure_column(name).map(|column| ActiveMeasure {
            name: name.to_string(),
            column: column.to_string(),
        })
    });
    let focus = criteria
        .focus_brand
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());

    let cards = grouped
        .domains
        .iter()
        .map(|domain| DomainCard {
            name: domain.name.clone(),
            slug: slugify(&domain.name),
            families: domain
                .families
                .iter()
                .map(|family| {
                    let row = tile_row(&family.members, focus);
                    let brands = brands_present(table, schema, &family.members);
                    let reading = active_measure
                        .as_ref()
                        .and_then(|measure| read_measure(table, row, measure));
                    FamilyTile {
                        name: family.name.clone(),
                        row,
                        focus: focus.map(|f| brands.iter().any(|b| b.eq_ignore_ascii_case(f))),
                        brands,
                        reading,
                    }
                })
                .collect(),
        })
        .collect();

    CatalogView {
        filtered_rows,
        grouped,
        cards,
        domains_only: criteria.domains_only,
        active_measure,
    }
}

/// Row a tile draws from: the representative row, or in the brand-row layout
/// the focus brand's row when it has one, else the first brand's row.
fn tile_row(members: &FamilyMembers, focus: Option<&str>) -> usize {
    match members {
        FamilyMembers::Representative(row) => *row,
        FamilyMembers::ByBrand(by_brand) => focus
            .and_then(|f| {
                by_brand
                    .iter()
                    .find(|(code, _)| code.eq_ignore_ascii_case(f))
                    .map(|(_, row)| *row)
            })
            .or_else(|| by_brand.first().map(|(_, row)| *row))
            .unwrap_or_default(),
    }
}

/// Brand codes that apply to a family.
fn brands_present(table: &Table, schema: &ColumnSchema, members: &FamilyMembers) -> Vec<String> {
    match (schema.layout(), members) {
        (BrandLayout::BrandColumns, FamilyMembers::Representative(row)) => schema
            .brand_columns
            .iter()
            .filter(|b| is_truthy(table.value(*row, &b.column)))
            .map(|b| b.code.clone())
            .collect(),
        (_, FamilyMembers::ByBrand(by_brand)) => by_brand
            .iter()
            .filter(|(_, row)| match schema.exists_column.as_deref() {
                Some(exists) => is_truthy(table.value(*row, exists)),
                None => true,
            })
            .map(|(code, _)| code.clone())
            .collect(),
        (BrandLayout::BrandRows, FamilyMembers::Representative(_)) => Vec::new(),
    }
}

fn read_measure(table: &Table, row: usize, measure: &ActiveMeasure) -> Option<MeasureReading> {
    let value = table.value(row, &measure.column);
    if value.is_empty() {
        return None;
    }
    Some(MeasureReading {
        measure: measure.name.clone(),
        value: to_text(value),
        colour: colour_for(value),
    })
}

/// Everything the detail drawer shows for one family tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileDetail {
    pub domain: String,
    pub family: String,
    /// Every selectable brand code and whether it applies to the family.
    pub brands: Vec<(String, bool)>,
    /// Every resolved measure, in vocabulary order, that has a value.
    pub readings: Vec<MeasureReading>,
    /// Numbers of the moats flagged on the tile's row.
    pub moats: Vec<String>,
    /// Use-case columns flagged on the tile's row, in dataset order.
    pub use_cases: Vec<String>,
}

/// Expand a tile into its detail view.
pub fn tile_detail(table: &Table, schema: &ColumnSchema, domain: &str, tile: &FamilyTile) -> TileDetail {
    let flagged = |column: &str| is_truthy(table.value(tile.row, column));

    TileDetail {
        domain: domain.to_string(),
        family: tile.name.clone(),
        brands: schema
            .selectable_brands()
            .into_iter()
            .map(|code| {
                let applies = tile.brands.iter().any(|b| b.eq_ignore_ascii_case(code));
                (code.to_string(), applies)
            })
            .collect(),
        readings: schema
            .available_measures()
            .filter_map(|m| {
                let measure = ActiveMeasure {
                    name: m.name.clone(),
                    column: m.column.clone()?,
                };
                read_measure(table, tile.row, &measure)
            })
            .collect(),
        moats: schema
            .moat_columns
            .iter()
            .filter(|m| flagged(&m.column))
            .map(|m| m.number.clone())
            .collect(),
        use_cases: schema
            .use_case_columns
            .iter()
            .filter(|u| flagged(&u.column))
            .map(|u| u.column.clone())
            .collect(),
    }
}
