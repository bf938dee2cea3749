// DomainLens - core/export.rs
//
// CSV export of filtered rows and JSON export of the computed view.
// Core layer: writes to any Write trait object.

use crate::core::coerce::to_text;
use crate::core::model::Table;
use crate::core::view::CatalogView;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export the rows at `rows` (indices into `table`) to CSV.
///
/// The header is the table's column list; cells are written in their text
/// form. Returns the number of data rows written.
pub fn export_csv<W: Write>(
    table: &Table,
    rows: &[usize],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_error = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns()).map_err(csv_error)?;

    let mut count = 0;
    for row in rows.iter().filter_map(|&idx| table.rows().get(idx)) {
        csv_writer
            .write_record(row.values().iter().map(to_text))
            .map_err(csv_error)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %export_path.display(), rows = count, "CSV export written");
    Ok(count)
}

/// Export the view's domain cards to pretty-printed JSON.
///
/// Returns the number of domain cards written.
pub fn export_json<W: Write>(
    view: &CatalogView,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, view).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        path = %export_path.display(),
        domains = view.cards.len(),
        "JSON export written"
    );
    Ok(view.cards.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterCriteria;
    use crate::core::model::Scalar;
    use crate::core::schema::{ColumnSchema, SchemaVocabulary};
    use crate::core::view::compute_view;

    fn sample() -> Table {
        Table::from_records(
            ["Domain", "Family", "AFI", "Quality"],
            vec![
                vec![
                    Scalar::from("Finance"),
                    Scalar::from("Ledger, General"),
                    Scalar::Bool(true),
                    Scalar::Number(85.0),
                ],
                vec![
                    Scalar::from("Supply Chain"),
                    Scalar::from("Inventory"),
                    Scalar::Bool(false),
                    Scalar::Number(42.5),
                ],
            ],
        )
    }

    #[test]
    fn test_csv_export_writes_selected_rows() {
        let table = sample();
        let mut buf = Vec::new();
        let count = export_csv(&table, &[1], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("Domain,Family,AFI,Quality"));
        assert_eq!(lines.next(), Some("Supply Chain,Inventory,false,42.5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_export_quotes_delimiters() {
        let table = sample();
        let mut buf = Vec::new();
        export_csv(&table, &[0], &mut buf, Path::new("out.csv")).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("\"Ledger, General\""));
        assert!(output.contains(",85\n"));
    }

    #[test]
    fn test_csv_export_ignores_out_of_range_indices() {
        let table = sample();
        let mut buf = Vec::new();
        let count = export_csv(&table, &[0, 7], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_json_export_contains_cards() {
        let table = sample();
        let schema = ColumnSchema::resolve(table.columns(), &SchemaVocabulary::default());
        let criteria = FilterCriteria {
            active_measure: Some("Quality".to_string()),
            ..Default::default()
        };
        let view = compute_view(&table, &schema, &criteria);

        let mut buf = Vec::new();
        let count = export_json(&view, &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["cards"][0]["slug"], "finance");
        assert_eq!(parsed["cards"][0]["families"][0]["reading"]["value"], "85");
        assert_eq!(parsed["active_measure"]["column"], "Quality");
        assert!(parsed.get("filtered_rows").is_none());
    }
}
