//! Post-imputation sorting.
//!
//! Sorting runs strictly after imputation, never before: the neighbor
//! search depends on the original row adjacency. Numeric columns sort
//! descending (scores first), textual columns ascending. A dataset that
//! carries arrival date columns and no explicit sort target is instead
//! ordered chronologically by year and month name. All failures here are
//! reported to the caller as warnings, never as fatal errors.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use tracing::debug;

/// Year column that triggers the chronological fallback sort.
pub const ARRIVAL_YEAR_COLUMN: &str = "arrival_date_year";

/// Month-name column that triggers the chronological fallback sort.
pub const ARRIVAL_MONTH_COLUMN: &str = "arrival_date_month";

const MONTH_HELPER_COLUMN: &str = "__month_num";

/// Sorts cleaned datasets.
pub struct Sorter;

impl Sorter {
    /// Sort by one column: descending when numeric, ascending otherwise.
    ///
    /// A textual column whose values parse as numbers is coerced first
    /// (parse failures become null) and sorted descending like a native
    /// numeric column.
    pub fn sort_by_column(df: &DataFrame, column: &str) -> Result<DataFrame> {
        let series = df
            .column(column)
            .map_err(|_| CleaningError::ColumnNotFound(column.to_string()))?
            .as_materialized_series()
            .clone();

        let mut df = df.clone();
        let descending = if is_numeric_dtype(series.dtype()) {
            true
        } else if let Some(coerced) = coerce_numeric(&series) {
            df.replace(column, coerced)
                .map_err(|e| sort_failed(column, e))?;
            true
        } else {
            false
        };

        debug!(
            "Sorting by '{}' ({})",
            column,
            if descending { "descending" } else { "ascending" }
        );

        df.sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(descending)
                .with_maintain_order(true),
        )
        .map_err(|e| sort_failed(column, e))
    }

    /// Sort chronologically by a year column and a month-name column.
    ///
    /// Month names are mapped to their calendar index (January = 1) and
    /// the rows ordered ascending by (year, month). Unrecognized month
    /// names sort first as nulls.
    pub fn sort_chronologically(df: &DataFrame, year_col: &str, month_col: &str) -> Result<DataFrame> {
        for col in [year_col, month_col] {
            if df.column(col).is_err() {
                return Err(CleaningError::ColumnNotFound(col.to_string()));
            }
        }

        let month_numbers = {
            let months = df
                .column(month_col)?
                .as_materialized_series()
                .cast(&DataType::String)
                .map_err(|e| sort_failed(month_col, e))?;
            let month_values: Vec<Option<u32>> = months
                .str()?
                .into_iter()
                .map(|v| v.and_then(month_index))
                .collect();
            Series::new(MONTH_HELPER_COLUMN.into(), month_values)
        };

        let mut df = df.clone();
        df.with_column(month_numbers)
            .map_err(|e| sort_failed(month_col, e))?;

        debug!("Sorting chronologically by '{}' and '{}'", year_col, month_col);

        let sorted = df
            .sort(
                [year_col, MONTH_HELPER_COLUMN],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .map_err(|e| sort_failed(year_col, e))?;

        sorted
            .drop(MONTH_HELPER_COLUMN)
            .map_err(CleaningError::from)
    }

    /// Whether the chronological fallback applies to this dataset.
    pub fn has_arrival_date_columns(df: &DataFrame) -> bool {
        df.column(ARRIVAL_YEAR_COLUMN).is_ok() && df.column(ARRIVAL_MONTH_COLUMN).is_ok()
    }
}

fn sort_failed(column: &str, err: PolarsError) -> CleaningError {
    CleaningError::SortFailed {
        column: column.to_string(),
        reason: err.to_string(),
    }
}

/// Map a month name to its calendar index (1-12).
pub fn month_index(name: &str) -> Option<u32> {
    name.trim()
        .parse::<chrono::Month>()
        .ok()
        .map(|m| m.number_from_month())
}

/// Check if a DataType is numeric (integer or float).
fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Parse a string column into f64 when at least one value is numeric.
///
/// Returns None for non-string columns and for columns with no parseable
/// value at all; parse failures within a coerced column become null.
fn coerce_numeric(series: &Series) -> Option<Series> {
    let str_series = series.str().ok()?;

    let parsed: Vec<Option<f64>> = str_series
        .into_iter()
        .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
        .collect();

    if parsed.iter().any(Option::is_some) {
        Some(Series::new(series.name().clone(), parsed))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column_strings(df: &DataFrame, col: &str) -> Vec<String> {
        let series = df.column(col).unwrap().as_materialized_series().clone();
        (0..series.len())
            .map(|i| {
                series
                    .get(i)
                    .unwrap()
                    .to_string()
                    .trim_matches('"')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_numeric_column_sorts_descending() {
        let df = df![
            "score" => [10.0, 40.0, 25.0],
        ]
        .unwrap();

        let sorted = Sorter::sort_by_column(&df, "score").unwrap();
        assert_eq!(column_strings(&sorted, "score"), vec!["40.0", "25.0", "10.0"]);
    }

    #[test]
    fn test_text_column_sorts_ascending() {
        let df = df![
            "city" => ["Oslo", "Bergen", "Tromso"],
        ]
        .unwrap();

        let sorted = Sorter::sort_by_column(&df, "city").unwrap();
        assert_eq!(
            column_strings(&sorted, "city"),
            vec!["Bergen", "Oslo", "Tromso"]
        );
    }

    #[test]
    fn test_numeric_strings_are_coerced_and_sort_descending() {
        let df = df![
            "score" => ["10", "40", "25"],
        ]
        .unwrap();

        let sorted = Sorter::sort_by_column(&df, "score").unwrap();
        assert_eq!(column_strings(&sorted, "score"), vec!["40.0", "25.0", "10.0"]);
    }

    #[test]
    fn test_missing_sort_column_is_reported() {
        let df = df!["a" => [1, 2]].unwrap();
        let err = Sorter::sort_by_column(&df, "missing").unwrap_err();
        assert!(err.is_sort_warning());
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index("January"), Some(1));
        assert_eq!(month_index("December"), Some(12));
        assert_eq!(month_index(" July "), Some(7));
        assert_eq!(month_index("Smarch"), None);
    }

    #[test]
    fn test_chronological_sort() {
        let df = df![
            "arrival_date_year" => [2016i64, 2015, 2015, 2016],
            "arrival_date_month" => ["July", "March", "January", "February"],
            "adr" => [100.0, 90.0, 80.0, 120.0],
        ]
        .unwrap();

        let sorted = Sorter::sort_chronologically(
            &df,
            ARRIVAL_YEAR_COLUMN,
            ARRIVAL_MONTH_COLUMN,
        )
        .unwrap();

        assert_eq!(
            column_strings(&sorted, "arrival_date_month"),
            vec!["January", "March", "February", "July"]
        );
        // Helper column must not leak into the result
        assert_eq!(sorted.width(), 3);
    }

    #[test]
    fn test_has_arrival_date_columns() {
        let hotel = df![
            "arrival_date_year" => [2016i64],
            "arrival_date_month" => ["July"],
        ]
        .unwrap();
        let plain = df!["a" => [1]].unwrap();

        assert!(Sorter::has_arrival_date_columns(&hotel));
        assert!(!Sorter::has_arrival_date_columns(&plain));
    }
}
