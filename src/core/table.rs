// DomainLens - core/table.rs
//
// Delimited-text parsing into a `Table`.
// Core layer: accepts text, never touches the filesystem. I/O is handled by
// platform::fs and app::load, which feed content here.

use crate::core::model::{Row, Scalar, Table};
use crate::util::constants;
use crate::util::error::LoadError;
use std::path::Path;

/// Parsing options for a dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Maximum number of data rows accepted.
    pub max_rows: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            max_rows: constants::DEFAULT_MAX_ROWS,
        }
    }
}

/// Parse delimited text with a header row into a typed `Table`.
///
/// `source` is used for error messages only (not for I/O).
///
/// - A leading UTF-8 byte-order mark is ignored.
/// - Records whose fields are all blank are skipped.
/// - Ragged records are accepted; see `Table::new`.
/// - Each field is typed with `Scalar::infer`.
pub fn parse_table(text: &str, source: &Path, options: &TableOptions) -> Result<Table, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| LoadError::Csv {
        path: source.to_path_buf(),
        source: e,
    })?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::MissingHeader {
            path: source.to_path_buf(),
        });
    }
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    let mut skipped_blank = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            skipped_blank += 1;
            continue;
        }
        if rows.len() >= options.max_rows {
            return Err(LoadError::TooManyRows {
                path: source.to_path_buf(),
                max: options.max_rows,
            });
        }
        rows.push(Row::new(record.iter().map(Scalar::infer).collect()));
    }

    tracing::debug!(
        source = %source.display(),
        columns = columns.len(),
        rows = rows.len(),
        skipped_blank,
        "Dataset parsed"
    );

    Ok(Table::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table, LoadError> {
        parse_table(text, Path::new("test.csv"), &TableOptions::default())
    }

    #[test]
    fn test_parses_header_and_typed_rows() {
        let table = parse("Domain,Family,AFI,Quality\nFinance,Ledger,TRUE,85\n").unwrap();
        assert_eq!(table.columns(), &["Domain", "Family", "AFI", "Quality"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "Domain"), &Scalar::from("Finance"));
        assert_eq!(table.value(0, "AFI"), &Scalar::Bool(true));
        assert_eq!(table.value(0, "Quality"), &Scalar::Number(85.0));
    }

    #[test]
    fn test_quoted_fields_and_crlf() {
        let table = parse("Domain,\"1.1 Plan, Forecast\"\r\n\"Supply, Chain\",x\r\n").unwrap();
        assert_eq!(table.columns()[1], "1.1 Plan, Forecast");
        assert_eq!(table.value(0, "Domain"), &Scalar::from("Supply, Chain"));
    }

    #[test]
    fn test_blank_records_skipped() {
        let table = parse("Domain,Family\n\n , \nFinance,Ledger\n,,\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bom_stripped_from_first_header() {
        let table = parse("\u{feff}Domain,Family\nA,B\n").unwrap();
        assert_eq!(table.column_index("Domain"), Some(0));
    }

    #[test]
    fn test_ragged_rows_accepted() {
        let table = parse("A,B,C\n1\n1,2,3,4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "C"), &Scalar::Empty);
        assert_eq!(table.value(1, "C"), &Scalar::Number(3.0));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse(""), Err(LoadError::MissingHeader { .. })));
        assert!(matches!(parse(" , \n"), Err(LoadError::MissingHeader { .. })));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = parse("Domain,Family\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_row_cap_enforced() {
        let options = TableOptions {
            max_rows: 2,
            ..Default::default()
        };
        let result = parse_table("A\n1\n2\n3\n", Path::new("cap.csv"), &options);
        assert!(matches!(result, Err(LoadError::TooManyRows { max: 2, .. })));
    }

    #[test]
    fn test_custom_delimiter() {
        let options = TableOptions {
            delimiter: b';',
            ..Default::default()
        };
        let table = parse_table("Domain;Family\nA;B\n", Path::new("semi.csv"), &options).unwrap();
        assert_eq!(table.value(0, "Family"), &Scalar::from("B"));
    }
}
