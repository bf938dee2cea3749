// DomainLens - core/schema.rs
//
// Column schema resolution. Infers the semantic role of each dataset column
// from its name, tolerant of naming variation. Resolution never fails: every
// role that cannot be found degrades to `None` / empty, and downstream stages
// treat an absent role as a disabled feature.
//
// Roles are assigned from two declarative rule tables evaluated in a fixed
// order:
//   - NAME_RULES:    ranked human-readable candidates, matched case-insensitively.
//   - PATTERN_RULES: regular-expression contracts over the raw column name.

use crate::util::constants;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

// =============================================================================
// Rule tables
// =============================================================================

/// Roles resolved by ranked name candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedRole {
    Domain,
    Family,
    Brand,
    Exists,
}

/// Candidate names per role, highest rank first.
const NAME_RULES: &[(NamedRole, &[&str])] = &[
    (
        NamedRole::Domain,
        &["Data Domain", "Domain", "DataDomain", "Domain Name"],
    ),
    (
        NamedRole::Family,
        &["Data Family", "Data Product", "Family", "DataFamily"],
    ),
    (
        NamedRole::Brand,
        &["Brand", "Brand Code", "BrandCode", "Brand Name"],
    ),
    (
        NamedRole::Exists,
        &["Exists", "Exists?", "Available", "Present", "Has Data"],
    ),
];

/// Roles resolved by column-name pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternRole {
    Moat,
    UseCase,
}

/// Moat flag columns, e.g. `MOAT 1`, ` moat2 - Logistics`.
///
/// Anchored at the start: optional whitespace, the word "moat" (any case),
/// optional whitespace, one or more digits, anything after.
/// Capture 1: the moat number.
pub const MOAT_PATTERN: &str = r"(?i)^\s*moat\s*(\d+)";

/// Use-case flag columns, e.g. `1.2 Forecasting`, `2.4.1 Slotting`.
///
/// Anchored at the start: `N.N` or `N.N.N`, whitespace, then a label.
/// Capture 1: the full dotted code. Capture 2: the owning moat number.
/// Capture 3: the label.
pub const USE_CASE_PATTERN: &str = r"^((\d+)\.\d+(?:\.\d+)?)\s+(\S.*)$";

/// Pattern rules in evaluation order; the first match assigns the role.
const PATTERN_RULES: &[(PatternRole, &str)] = &[
    (PatternRole::Moat, MOAT_PATTERN),
    (PatternRole::UseCase, USE_CASE_PATTERN),
];

static COMPILED_RULES: OnceLock<Vec<(PatternRole, Regex)>> = OnceLock::new();

fn compiled_rules() -> &'static [(PatternRole, Regex)] {
    COMPILED_RULES.get_or_init(|| {
        PATTERN_RULES
            .iter()
            .filter_map(|(role, source)| match Regex::new(source) {
                Ok(regex) => Some((*role, regex)),
                Err(e) => {
                    tracing::error!(
                        pattern = *source,
                        error = %e,
                        "Column pattern failed to compile; role disabled"
                    );
                    None
                }
            })
            .collect()
    })
}

// =============================================================================
// Schema types
// =============================================================================

/// Vocabulary that varies per deployment but is fixed per instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVocabulary {
    /// Canonical brand codes, in display order.
    pub brand_codes: Vec<String>,
    /// Measure names, in display order.
    pub measures: Vec<String>,
}

impl Default for SchemaVocabulary {
    fn default() -> Self {
        Self {
            brand_codes: constants::DEFAULT_BRAND_CODES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            measures: constants::DEFAULT_MEASURES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// How brand membership is encoded in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum BrandLayout {
    /// One boolean column per brand code; one row per family.
    #[default]
    BrandColumns,
    /// A brand column holding the code; one row per (domain, family, brand).
    BrandRows,
}

/// A canonical brand code and the dataset column that carries its flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandColumn {
    pub code: String,
    pub column: String,
}

/// A measure name and the column holding it, if present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasureColumn {
    pub name: String,
    pub column: Option<String>,
}

/// A moat flag column and its number (leading zeros stripped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoatColumn {
    pub number: String,
    pub column: String,
}

/// A use-case flag column nested under a moat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCaseColumn {
    pub column: String,
    /// Number of the owning moat (leading path segment).
    pub moat: String,
    /// Dotted code, e.g. `1.2.3`.
    pub code: String,
    pub label: String,
}

/// Semantic roles of the dataset's columns. Immutable once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub domain_column: Option<String>,
    pub family_column: Option<String>,
    /// Brand flag columns present in the dataset, in canonical code order.
    pub brand_columns: Vec<BrandColumn>,
    /// One entry per vocabulary measure, in vocabulary order.
    pub measure_columns: Vec<MeasureColumn>,
    /// One column per moat number, sorted numerically.
    pub moat_columns: Vec<MoatColumn>,
    /// Use-case columns in dataset order.
    pub use_case_columns: Vec<UseCaseColumn>,
    /// Brand code column (row-per-brand datasets).
    pub brand_column: Option<String>,
    /// Existence flag column (row-per-brand datasets).
    pub exists_column: Option<String>,
    /// Brand vocabulary the schema was resolved against.
    pub brand_codes: Vec<String>,
}

impl ColumnSchema {
    /// Resolve column roles from the dataset's ordered column names.
    pub fn resolve(columns: &[String], vocabulary: &SchemaVocabulary) -> Self {
        // Lowercased (trimmed) name -> original name; first occurrence wins.
        let mut lookup: HashMap<String, &str> = HashMap::with_capacity(columns.len());
        for column in columns {
            lookup
                .entry(column.trim().to_lowercase())
                .or_insert(column.as_str());
        }
        let find = |name: &str| {
            lookup
                .get(&name.trim().to_lowercase())
                .map(|c| (*c).to_string())
        };
        let find_role = |role: NamedRole| {
            NAME_RULES
                .iter()
                .filter(|(r, _)| *r == role)
                .flat_map(|(_, candidates)| candidates.iter())
                .find_map(|candidate| find(*candidate))
        };

        let domain_column = find_role(NamedRole::Domain).or_else(|| {
            let fallback = columns.first().cloned();
            tracing::debug!(column = ?fallback, "No domain column by name; using first");
            fallback
        });
        let family_column = find_role(NamedRole::Family).or_else(|| {
            let fallback = columns.get(1).cloned();
            tracing::debug!(column = ?fallback, "No family column by name; using second");
            fallback
        });

        let brand_columns = vocabulary
            .brand_codes
            .iter()
            .filter_map(|code| {
                find(code.as_str()).map(|column| BrandColumn {
                    code: code.clone(),
                    column,
                })
            })
            .collect();

        let measure_columns = vocabulary
            .measures
            .iter()
            .map(|name| MeasureColumn {
                name: name.clone(),
                column: find(name.as_str()),
            })
            .collect();

        let (moat_columns, use_case_columns) = resolve_patterned(columns);

        let schema = Self {
            domain_column,
            family_column,
            brand_columns,
            measure_columns,
            moat_columns,
            use_case_columns,
            brand_column: find_role(NamedRole::Brand),
            exists_column: find_role(NamedRole::Exists),
            brand_codes: vocabulary.brand_codes.clone(),
        };

        tracing::info!(
            domain = ?schema.domain_column,
            family = ?schema.family_column,
            brands = schema.brand_columns.len(),
            measures = schema.measure_columns.iter().filter(|m| m.column.is_some()).count(),
            moats = schema.moat_columns.len(),
            use_cases = schema.use_case_columns.len(),
            layout = ?schema.layout(),
            "Column schema resolved"
        );

        schema
    }

    /// Brand encoding in use: row-per-brand when a brand column resolved.
    pub fn layout(&self) -> BrandLayout {
        if self.brand_column.is_some() {
            BrandLayout::BrandRows
        } else {
            BrandLayout::BrandColumns
        }
    }

    /// Column holding `measure`, if the measure is known and present.
    pub fn measure_column(&self, measure: &str) -> Option<&str> {
        self.measure_columns
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(measure))
            .and_then(|m| m.column.as_deref())
    }

    /// Measures whose column resolved, in vocabulary order.
    pub fn available_measures(&self) -> impl Iterator<Item = &MeasureColumn> {
        self.measure_columns.iter().filter(|m| m.column.is_some())
    }

    /// Moat column for a moat number key such as `"1"` or `"01"`.
    pub fn moat(&self, number: &str) -> Option<&MoatColumn> {
        let key = normalize_number(number.trim())?;
        self.moat_columns.iter().find(|m| m.number == key)
    }

    /// Use-case columns nested under the given moat, in dataset order.
    pub fn use_cases_for_moat<'a>(
        &'a self,
        number: &str,
    ) -> impl Iterator<Item = &'a UseCaseColumn> + 'a {
        let key = normalize_number(number.trim());
        self.use_case_columns
            .iter()
            .filter(move |u| key.as_deref() == Some(u.moat.as_str()))
    }

    /// Use-case entry for an exact column name.
    pub fn use_case(&self, column: &str) -> Option<&UseCaseColumn> {
        self.use_case_columns.iter().find(|u| u.column == column)
    }

    /// Brand codes a user can select.
    ///
    /// Column layout: only codes whose column is present. Row layout: the
    /// whole vocabulary, since codes live in cell values.
    pub fn selectable_brands(&self) -> Vec<&str> {
        match self.layout() {
            BrandLayout::BrandColumns => {
                self.brand_columns.iter().map(|b| b.code.as_str()).collect()
            }
            BrandLayout::BrandRows => self.brand_codes.iter().map(String::as_str).collect(),
        }
    }

    /// Flag column for a brand code in the column layout.
    pub fn brand_flag_column(&self, code: &str) -> Option<&str> {
        self.brand_columns
            .iter()
            .find(|b| b.code.eq_ignore_ascii_case(code))
            .map(|b| b.column.as_str())
    }
}

/// Apply PATTERN_RULES to every column.
fn resolve_patterned(columns: &[String]) -> (Vec<MoatColumn>, Vec<UseCaseColumn>) {
    let mut moats: Vec<MoatColumn> = Vec::new();
    let mut use_cases = Vec::new();

    for column in columns {
        let Some((role, caps)) = compiled_rules()
            .iter()
            .find_map(|(role, regex)| regex.captures(column).map(|caps| (*role, caps)))
        else {
            continue;
        };

        match role {
            PatternRole::Moat => {
                let Some(number) = caps.get(1).and_then(|m| normalize_number(m.as_str())) else {
                    continue;
                };
                if moats.iter().any(|m| m.number == number) {
                    tracing::debug!(
                        column = %column,
                        number = %number,
                        "Duplicate moat number; keeping first column"
                    );
                    continue;
                }
                moats.push(MoatColumn {
                    number,
                    column: column.clone(),
                });
            }
            PatternRole::UseCase => {
                let (Some(code), Some(moat), Some(label)) = (caps.get(1), caps.get(2), caps.get(3))
                else {
                    continue;
                };
                let Some(moat) = normalize_number(moat.as_str()) else {
                    continue;
                };
                use_cases.push(UseCaseColumn {
                    column: column.clone(),
                    moat,
                    code: code.as_str().to_string(),
                    label: label.as_str().trim_end().to_string(),
                });
            }
        }
    }

    // Numeric order without parsing: shorter digit runs sort first.
    moats.sort_by(|a, b| {
        a.number
            .len()
            .cmp(&b.number.len())
            .then_with(|| a.number.cmp(&b.number))
    });

    (moats, use_cases)
}

/// Canonical form of a digit run: leading zeros stripped (`"007"` -> `"7"`,
/// `"0"` -> `"0"`). Returns `None` for anything that is not all ASCII digits.
pub fn normalize_number(digits: &str) -> Option<String> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let stripped = digits.trim_start_matches('0');
    Some(if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn resolve(names: &[&str]) -> ColumnSchema {
        ColumnSchema::resolve(&cols(names), &SchemaVocabulary::default())
    }

    #[test]
    fn test_ordinal_fallback_for_domain_and_family() {
        let schema = resolve(&["Foo", "Bar", "Quality"]);
        assert_eq!(schema.domain_column.as_deref(), Some("Foo"));
        assert_eq!(schema.family_column.as_deref(), Some("Bar"));
        assert_eq!(schema.measure_column("Quality"), Some("Quality"));
        assert_eq!(schema.measure_column("Timeliness"), None);
    }

    #[test]
    fn test_named_candidates_match_case_insensitively() {
        let schema = resolve(&["id", "data family", "DATA DOMAIN", "quality"]);
        assert_eq!(schema.domain_column.as_deref(), Some("DATA DOMAIN"));
        assert_eq!(schema.family_column.as_deref(), Some("data family"));
        assert_eq!(schema.measure_column("Quality"), Some("quality"));
    }

    #[test]
    fn test_candidate_rank_beats_column_order() {
        let schema = resolve(&["Domain", "Data Domain", "Family"]);
        assert_eq!(schema.domain_column.as_deref(), Some("Data Domain"));
    }

    #[test]
    fn test_empty_columns_resolve_to_nothing() {
        let schema = resolve(&[]);
        assert!(schema.domain_column.is_none());
        assert!(schema.family_column.is_none());
        assert!(schema.brand_columns.is_empty());
        assert!(schema.moat_columns.is_empty());
        assert_eq!(schema.measure_columns.len(), 4);
        assert!(schema.available_measures().next().is_none());
    }

    #[test]
    fn test_brand_columns_follow_canonical_order() {
        let schema = resolve(&["Domain", "Family", "rh", "AFI"]);
        let codes: Vec<_> = schema.brand_columns.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["AFI", "RH"]);
        assert_eq!(schema.brand_flag_column("rh"), Some("rh"));
        assert_eq!(schema.brand_flag_column("ADG"), None);
        assert_eq!(schema.layout(), BrandLayout::BrandColumns);
        assert_eq!(schema.selectable_brands(), vec!["AFI", "RH"]);
    }

    #[test]
    fn test_brand_row_layout_detected() {
        let schema = resolve(&["Domain", "Family", "Brand", "Exists", "Quality"]);
        assert_eq!(schema.layout(), BrandLayout::BrandRows);
        assert_eq!(schema.brand_column.as_deref(), Some("Brand"));
        assert_eq!(schema.exists_column.as_deref(), Some("Exists"));
        assert_eq!(schema.selectable_brands(), vec!["AFI", "ADG", "RH"]);
    }

    #[test]
    fn test_moat_columns_extracted_deduplicated_and_sorted() {
        let schema = resolve(&[
            "Domain",
            "Family",
            "MOAT 10",
            " moat2 Logistics",
            "Moat 1",
            "MOAT 01 duplicate",
            "Moatless",
            "My MOAT 3",
        ]);
        let moats: Vec<_> = schema
            .moat_columns
            .iter()
            .map(|m| (m.number.as_str(), m.column.as_str()))
            .collect();
        assert_eq!(
            moats,
            vec![("1", "Moat 1"), ("2", " moat2 Logistics"), ("10", "MOAT 10")]
        );
        assert_eq!(schema.moat("01").map(|m| m.column.as_str()), Some("Moat 1"));
        assert!(schema.moat("4").is_none());
        assert!(schema.moat("one").is_none());
    }

    #[test]
    fn test_use_case_columns_belong_to_leading_moat() {
        let schema = resolve(&[
            "Domain",
            "Family",
            "MOAT 1",
            "1.1 Forecasting",
            "1.2.3 Replenishment planning",
            "2.4.1 Slotting",
            "1.2",
            "12.1 Loyalty",
            "v1.1 Not a use case",
        ]);
        let codes: Vec<_> = schema
            .use_case_columns
            .iter()
            .map(|u| (u.code.as_str(), u.moat.as_str(), u.label.as_str()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("1.1", "1", "Forecasting"),
                ("1.2.3", "1", "Replenishment planning"),
                ("2.4.1", "2", "Slotting"),
                ("12.1", "12", "Loyalty"),
            ]
        );
        let under_one: Vec<_> = schema
            .use_cases_for_moat("1")
            .map(|u| u.column.as_str())
            .collect();
        assert_eq!(under_one, vec!["1.1 Forecasting", "1.2.3 Replenishment planning"]);
        assert!(schema.use_case("2.4.1 Slotting").is_some());
        assert!(schema.use_case("1.2").is_none());
    }

    #[test]
    fn test_use_case_requires_a_label() {
        let schema = resolve(&["Domain", "Family", "1.2 ", "1.3\t", "1.4 Routing"]);
        let columns: Vec<_> = schema
            .use_case_columns
            .iter()
            .map(|u| u.column.as_str())
            .collect();
        assert_eq!(columns, vec!["1.4 Routing"]);
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = SchemaVocabulary {
            brand_codes: cols(&["ZZ"]),
            measures: cols(&["Freshness"]),
        };
        let schema = ColumnSchema::resolve(
            &cols(&["Domain", "Family", "zz", "FRESHNESS", "Quality"]),
            &vocabulary,
        );
        assert_eq!(schema.brand_columns.len(), 1);
        assert_eq!(schema.measure_column("Freshness"), Some("FRESHNESS"));
        assert_eq!(schema.measure_column("Quality"), None);
    }

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("007").as_deref(), Some("7"));
        assert_eq!(normalize_number("000").as_deref(), Some("0"));
        assert_eq!(normalize_number("12").as_deref(), Some("12"));
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number("1a"), None);
    }
}
