//! Input format conversion.
//!
//! The cleaning pipeline works on CSV. Spreadsheet and JSON inputs are
//! converted to an equivalent CSV file next to the original (same stem,
//! `.csv` extension) before loading; CSV inputs pass through untouched.
//! Any other extension is rejected before a load is attempted.

use crate::error::{CleaningError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert an input file to CSV, returning the path of the CSV to load.
///
/// `.csv` returns the input path unchanged; `.xls`/`.xlsx` and `.json`
/// produce `<stem>.csv` beside the input. Extension matching is
/// case-insensitive.
pub fn convert_to_csv(path: &Path) -> Result<PathBuf> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(path.to_path_buf()),
        "xls" | "xlsx" => excel_to_csv(path),
        "json" => json_to_csv(path),
        other => Err(CleaningError::UnsupportedFormat(other.to_string())),
    }
}

/// Read the first worksheet and write it as CSV.
///
/// Cells are rendered to text; the downstream loader re-infers column
/// types from the CSV form.
fn excel_to_csv(path: &Path) -> Result<PathBuf> {
    let read_error = |reason: String| CleaningError::Read {
        path: path.display().to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| read_error("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| read_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| read_error(format!("sheet '{}' is empty", sheet_name)))?
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(headers.len()) {
            columns[idx].push(render_cell(cell));
        }
    }

    let polars_columns: Vec<Column> = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();
    let mut df = DataFrame::new(polars_columns)?;

    let csv_path = path.with_extension("csv");
    write_intermediate_csv(&mut df, &csv_path)?;
    info!("Converted Excel to CSV: {}", csv_path.display());

    Ok(csv_path)
}

/// Read a JSON array of records and write it as CSV.
fn json_to_csv(path: &Path) -> Result<PathBuf> {
    let bytes = fs::read(path).map_err(|e| CleaningError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut df = JsonReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|e| CleaningError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let csv_path = path.with_extension("csv");
    write_intermediate_csv(&mut df, &csv_path)?;
    info!("Converted JSON to CSV: {}", csv_path.display());

    Ok(csv_path)
}

fn write_intermediate_csv(df: &mut DataFrame, csv_path: &Path) -> Result<()> {
    let mut file = File::create(csv_path).map_err(|e| CleaningError::Write {
        path: csv_path.display().to_string(),
        reason: e.to_string(),
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| CleaningError::Write {
            path: csv_path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(())
}

/// Render one spreadsheet cell as text; empty and error cells are missing.
fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_passes_through() {
        let path = Path::new("data/records.csv");
        assert_eq!(convert_to_csv(path).unwrap(), path.to_path_buf());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let path = Path::new("data/RECORDS.CSV");
        assert_eq!(convert_to_csv(path).unwrap(), path.to_path_buf());
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = convert_to_csv(Path::new("data/records.parquet")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("parquet"));
    }

    #[test]
    fn test_missing_extension_rejected() {
        let err = convert_to_csv(Path::new("data/records")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(&Data::Empty), None);
        assert_eq!(
            render_cell(&Data::String("Oslo".to_string())),
            Some("Oslo".to_string())
        );
        assert_eq!(render_cell(&Data::Int(3)), Some("3".to_string()));
        assert_eq!(render_cell(&Data::Bool(true)), Some("true".to_string()));
    }
}
