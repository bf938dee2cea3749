// DomainLens - core/group.rs
//
// Grouping of filtered rows into domain -> family (-> brand) structure.
// Core layer: pure logic, no I/O or UI dependencies.
//
// Rules:
//   - Rows with an empty domain, or the domain "Other" (any case), never
//     appear in a grouped view. Rows with an empty family are dropped too.
//   - Brand-column layout: one representative row per family, first seen wins.
//   - Brand-row layout: one row per (family, brand), last seen wins, with
//     brands in vocabulary order.
//   - Domains and families are emitted in ascending lexicographic order.

use crate::core::coerce::to_key;
use crate::core::model::Table;
use crate::core::schema::{BrandLayout, ColumnSchema};
use crate::util::constants;
use serde::Serialize;
use std::collections::BTreeMap;

/// Grouped, deduplicated view over a filtered row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedView {
    pub layout: BrandLayout,
    /// Sorted ascending by name.
    pub domains: Vec<DomainGroup>,
}

/// A domain and its distinct families.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainGroup {
    pub name: String,
    /// Sorted ascending by name.
    pub families: Vec<FamilyGroup>,
}

/// A family and the row(s) that represent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyGroup {
    pub name: String,
    pub members: FamilyMembers,
}

/// Representative rows of a family, as indices into the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FamilyMembers {
    /// Brand-column layout: the first row seen for the family.
    Representative(usize),
    /// Brand-row layout: (brand code, last row seen for that brand), in
    /// vocabulary order with unknown codes last.
    ByBrand(Vec<(String, usize)>),
}

impl FamilyMembers {
    /// Every representative row index, in brand-code order for `ByBrand`.
    pub fn rows(&self) -> Vec<usize> {
        match self {
            FamilyMembers::Representative(row) => vec![*row],
            FamilyMembers::ByBrand(by_brand) => by_brand.iter().map(|(_, row)| *row).collect(),
        }
    }
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn family_count(&self) -> usize {
        self.domains.iter().map(|d| d.families.len()).sum()
    }

    pub fn domain(&self, name: &str) -> Option<&DomainGroup> {
        self.domains.iter().find(|d| d.name == name)
    }
}

impl DomainGroup {
    pub fn family(&self, name: &str) -> Option<&FamilyGroup> {
        self.families.iter().find(|f| f.name == name)
    }
}

/// True when a domain value is excluded from every view.
pub fn is_excluded_domain(domain: &str) -> bool {
    domain.is_empty() || domain.eq_ignore_ascii_case(constants::EXCLUDED_DOMAIN)
}

/// Group the rows at `rows` (indices into `table`, in presentation order).
pub fn group_rows(table: &Table, schema: &ColumnSchema, rows: &[usize]) -> GroupedView {
    let layout = schema.layout();
    let position = |column: Option<&str>| column.and_then(|c| table.column_index(c));
    let domain_col = position(schema.domain_column.as_deref());
    let family_col = position(schema.family_column.as_deref());
    let brand_col = position(schema.brand_column.as_deref());

    let key_at = |row: usize, column: Option<usize>| -> String {
        match (table.rows().get(row), column) {
            (Some(r), Some(c)) => to_key(Table::cell(r, c)),
            _ => String::new(),
        }
    };

    let mut domains: BTreeMap<String, BTreeMap<String, FamilyMembers>> = BTreeMap::new();
    let mut excluded = 0usize;

    for &row in rows {
        let domain = key_at(row, domain_col);
        let family = key_at(row, family_col);
        if is_excluded_domain(&domain) || family.is_empty() {
            excluded += 1;
            continue;
        }

        let families = domains.entry(domain).or_default();
        match layout {
            BrandLayout::BrandColumns => {
                families
                    .entry(family)
                    .or_insert(FamilyMembers::Representative(row));
            }
            BrandLayout::BrandRows => {
                let brand = canonical_brand(&key_at(row, brand_col), &schema.brand_codes);
                if brand.is_empty() {
                    excluded += 1;
                    continue;
                }
                let members = families
                    .entry(family)
                    .or_insert_with(|| FamilyMembers::ByBrand(Vec::new()));
                if let FamilyMembers::ByBrand(by_brand) = members {
                    match by_brand.iter_mut().find(|(code, _)| *code == brand) {
                        Some(entry) => entry.1 = row,
                        None => by_brand.push((brand, row)),
                    }
                }
            }
        }
    }

    // Domains whose rows all had a blank brand have no families.
    domains.retain(|_, families| !families.is_empty());

    for members in domains.values_mut().flat_map(|families| families.values_mut()) {
        if let FamilyMembers::ByBrand(by_brand) = members {
            by_brand.sort_by_cached_key(|(code, _)| brand_rank(code, &schema.brand_codes));
        }
    }

    let view = GroupedView {
        layout,
        domains: domains
            .into_iter()
            .map(|(name, families)| DomainGroup {
                name,
                families: families
                    .into_iter()
                    .map(|(name, members)| FamilyGroup { name, members })
                    .collect(),
            })
            .collect(),
    };

    tracing::debug!(
        rows = rows.len(),
        excluded,
        domains = view.domain_count(),
        families = view.family_count(),
        "Rows grouped"
    );

    view
}

/// Sort key placing vocabulary codes in vocabulary order, then any other
/// codes alphabetically.
fn brand_rank(code: &str, vocabulary: &[String]) -> (usize, String) {
    match vocabulary.iter().position(|c| c == code) {
        Some(index) => (index, String::new()),
        None => (vocabulary.len(), code.to_string()),
    }
}

/// Canonical spelling of a brand code when it is in the vocabulary.
fn canonical_brand(raw: &str, vocabulary: &[String]) -> String {
    vocabulary
        .iter()
        .find(|code| code.eq_ignore_ascii_case(raw))
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}
