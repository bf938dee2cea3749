// DomainLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// A dataset is a `Table`: an ordered list of column names plus rows of
// `Scalar` values addressed positionally. Rows are immutable once loaded and
// are identified by their index in `Table::rows`.

use serde::Serialize;
use std::collections::HashMap;

// =============================================================================
// Scalar
// =============================================================================

/// A single cell value after opportunistic typing.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Scalar {
    /// Blank or missing cell.
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Type a raw field the way the loader does.
    ///
    /// Blank (after trimming) becomes `Empty`, `true`/`false` in any case
    /// become `Bool`, finite decimal numbers become `Number`, and everything
    /// else is kept verbatim as `Text`.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Scalar::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Scalar::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Scalar::Bool(false);
        }
        if looks_numeric(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Scalar::Number(n);
                }
            }
        }
        Scalar::Text(raw.to_string())
    }

    /// True for blank cells, including whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Empty => true,
            Scalar::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// `f64::from_str` also accepts "inf", "NaN" and friends; a dataset cell only
/// counts as numeric when it is made of digits, sign, point and exponent.
fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Empty, Into::into)
    }
}

// =============================================================================
// Row and Table
// =============================================================================

/// One data row; values are positional, aligned with `Table::columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Scalar>,
}

impl Row {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }
}

static EMPTY: Scalar = Scalar::Empty;

/// A loaded dataset: ordered column names plus rows in source order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, padding short rows with `Empty` and truncating long ones
    /// so every row has exactly one value per column.
    ///
    /// Duplicate column names resolve to their first occurrence.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, Scalar::Empty);
                row
            })
            .collect();
        Self {
            columns,
            index,
            rows,
        }
    }

    /// Convenience constructor from plain value vectors.
    pub fn from_records<C, R>(columns: C, records: Vec<R>) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Scalar>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|r| Row::new(r.into_iter().collect()))
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of an exact column name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Value of `column` in the row at `row`; `Empty` when either is absent.
    pub fn value(&self, row: usize, column: &str) -> &Scalar {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(r), Some(c)) => Self::cell(r, c),
            _ => &EMPTY,
        }
    }

    /// Positional cell lookup; `Empty` when out of range.
    pub fn cell(row: &Row, column: usize) -> &Scalar {
        row.values.get(column).unwrap_or(&EMPTY)
    }
}
