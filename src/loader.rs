//! Sales history loader.
//!
//! Parses tabular daily sales exports into `SalesRecord` structs.
//! Expected CSV columns: Product, Date, Sales (extra columns are ignored).

use std::fs::File;
use std::io::Read;

use crate::error::{AnalyzerError, Result};
use crate::model::SalesRecord;

const REQUIRED_COLUMNS: [&str; 3] = ["Product", "Date", "Sales"];

/// Load sales records from any CSV reader.
pub fn load_sales<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalyzerError::DataFormat {
            line: 1,
            reason: format!("unreadable header row: {}", e),
        })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalyzerError::DataFormat {
                line: 1,
                reason: format!("missing required column '{}'", column),
            });
        }
    }

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        // Header occupies line 1, so data starts at line 2.
        let line = line_num + 2;
        let record: SalesRecord = result.map_err(|e| AnalyzerError::DataFormat {
            line,
            reason: e.to_string(),
        })?;
        if !record.quantity.is_finite() || record.quantity < 0.0 {
            return Err(AnalyzerError::DataFormat {
                line,
                reason: format!(
                    "sales quantity {} for product '{}' must be a non-negative number",
                    record.quantity, record.product
                ),
            });
        }
        records.push(record);
    }

    tracing::info!(rows = records.len(), "loaded sales history");
    Ok(records)
}

/// Load sales records from a CSV file path.
pub fn load_sales_history(path: &str) -> Result<Vec<SalesRecord>> {
    let file = File::open(path).map_err(|source| AnalyzerError::FileOpen {
        path: path.to_string(),
        source,
    })?;
    load_sales(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE_CSV: &str = "\
Product,Date,Sales
Widget A,2024-03-01,10
Widget A,2024-03-02,12
Widget B,03/01/2024,4
Widget A,2024-03-03,8
Widget B,2024-03-02,6
";

    #[test]
    fn load_sample_csv() {
        let records = load_sales(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].product, "Widget A");
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!((records[0].quantity - 10.0).abs() < 1e-9);
        // The spreadsheet-style date normalizes to the same calendar day.
        assert_eq!(records[2].date, records[0].date);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv_data = "\
Store,Product,Date,Sales
north,Widget A,2024-03-01,10
";
        let records = load_sales(csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, "Widget A");
    }

    #[test]
    fn missing_column_is_reported() {
        let csv_data = "Product,Sales\nWidget A,10\n";
        let err = load_sales(csv_data.as_bytes()).unwrap_err();
        match err {
            AnalyzerError::DataFormat { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("'Date'"), "reason was: {}", reason);
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_date_names_the_line() {
        let csv_data = "\
Product,Date,Sales
Widget A,2024-03-01,10
Widget A,someday,12
";
        let err = load_sales(csv_data.as_bytes()).unwrap_err();
        match err {
            AnalyzerError::DataFormat { line, .. } => assert_eq!(line, 3),
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_quantity_is_rejected() {
        let csv_data = "\
Product,Date,Sales
Widget A,2024-03-01,lots
";
        assert!(matches!(
            load_sales(csv_data.as_bytes()),
            Err(AnalyzerError::DataFormat { line: 2, .. })
        ));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let csv_data = "\
Product,Date,Sales
Widget A,2024-03-01,10
Widget B,2024-03-01,-3
";
        let err = load_sales(csv_data.as_bytes()).unwrap_err();
        match err {
            AnalyzerError::DataFormat { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Widget B"), "reason was: {}", reason);
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_sales_history("no_such_history.csv").unwrap_err();
        match err {
            AnalyzerError::FileOpen { path, .. } => {
                assert_eq!(path, "no_such_history.csv");
            }
            other => panic!("expected FileOpen, got {:?}", other),
        }
    }
}
