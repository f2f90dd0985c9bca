//! Missing-marker normalization.
//!
//! Datasets spell missingness in several ways: the native null, an empty
//! string, or one of the literal strings `"NULL"`, `"null"`, `"None"`.
//! Before imputation all four forms are collapsed into the single canonical
//! sentinel (the polars null). The rewrite is destructive: a legitimate
//! value equal to one of those literals is indistinguishable from
//! missingness afterwards.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// The closed set of string spellings treated as missing.
///
/// Matching is exact (case-sensitive, no trimming): `"Null"` or `" NULL "`
/// are kept as data.
pub const MISSING_MARKERS: [&str; 4] = ["", "NULL", "null", "None"];

/// Replace every missing-marker spelling with null, in place.
///
/// Only string columns are scanned; numeric columns already carry their
/// missingness as null. Returns the number of cells rewritten. Applying
/// this twice is a no-op the second time.
pub fn normalize_missing(df: &mut DataFrame) -> Result<usize> {
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut total_replaced = 0;

    for col_name in &column_names {
        let replaced = {
            let series = df.column(col_name)?.as_materialized_series();
            if series.dtype() != &DataType::String {
                continue;
            }

            let str_series = series.str()?;
            let mut normalized = Vec::with_capacity(str_series.len());
            let mut replaced = 0;

            for opt_val in str_series.into_iter() {
                match opt_val {
                    Some(val) if MISSING_MARKERS.contains(&val) => {
                        normalized.push(None);
                        replaced += 1;
                    }
                    Some(val) => normalized.push(Some(val.to_string())),
                    None => normalized.push(None),
                }
            }

            if replaced > 0 {
                let normalized_series = Series::new(col_name.as_str().into(), normalized);
                df.replace(col_name, normalized_series)?;
            }
            replaced
        };

        total_replaced += replaced;
    }

    if total_replaced > 0 {
        debug!("Normalized {} missing-marker cells to null", total_replaced);
    }

    Ok(total_replaced)
}

/// Count missing cells across the whole dataset.
///
/// Defined purely over the canonical sentinel: call [`normalize_missing`]
/// first if raw marker strings may still be present.
pub fn count_missing(df: &DataFrame) -> usize {
    df.get_columns()
        .iter()
        .map(|col| col.as_materialized_series().null_count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marker_frame() -> DataFrame {
        df![
            "city" => [Some("Oslo"), Some("NULL"), Some(""), Some("null"), Some("None"), None],
            "score" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_all_marker_spellings_collapse() {
        let mut df = marker_frame();
        let replaced = normalize_missing(&mut df).unwrap();

        assert_eq!(replaced, 4);
        let city = df.column("city").unwrap();
        assert_eq!(city.null_count(), 5);
        assert_eq!(city.get(0).unwrap().to_string(), "\"Oslo\"");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let mut df = df![
            "v" => [Some("Null"), Some("NONE"), Some("none"), Some("NULL")],
        ]
        .unwrap();

        let replaced = normalize_missing(&mut df).unwrap();

        // Only the exact spelling "NULL" is in the closed set here
        assert_eq!(replaced, 1);
        assert_eq!(df.column("v").unwrap().null_count(), 1);
    }

    #[test]
    fn test_whitespace_padded_markers_are_kept() {
        let mut df = df![
            "v" => [Some(" NULL "), Some("NULL")],
        ]
        .unwrap();

        let replaced = normalize_missing(&mut df).unwrap();
        assert_eq!(replaced, 1);
        assert_eq!(
            df.column("v").unwrap().get(0).unwrap().to_string(),
            "\" NULL \""
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut df = marker_frame();
        let first = normalize_missing(&mut df).unwrap();
        let snapshot = df.clone();
        let second = normalize_missing(&mut df).unwrap();

        assert_eq!(first, 4);
        assert_eq!(second, 0);
        assert!(df.equals_missing(&snapshot));
    }

    #[test]
    fn test_numeric_columns_untouched() {
        let mut df = marker_frame();
        normalize_missing(&mut df).unwrap();

        let score = df.column("score").unwrap();
        assert_eq!(score.null_count(), 1);
        assert_eq!(score.dtype(), &DataType::Float64);
    }

    #[test]
    fn test_count_missing() {
        let mut df = marker_frame();
        assert_eq!(count_missing(&df), 2); // native nulls only before normalization

        normalize_missing(&mut df).unwrap();
        assert_eq!(count_missing(&df), 6);
    }
}
